pub mod countdown;
pub mod field;
pub mod geom;
pub mod observable;
pub mod particle;
