pub mod normalize;
pub mod publish;
