pub mod lognormal;
