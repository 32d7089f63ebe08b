mod act_fn;
mod sigmoid;

pub use act_fn::ActivationMode;
pub use sigmoid::Sigmoid;
