#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sigmoid;

impl Sigmoid {
    pub fn f(&self, z: f64) -> f64 {
        1. / (1. + (-z).exp())
    }

    pub fn df(&self, z: f64) -> f64 {
        self.df_from_output(self.f(z))
    }

    /// The derivative written in terms of the already activated value `s = f(z)`.
    pub fn df_from_output(&self, s: f64) -> f64 {
        s * (1. - s)
    }
}
