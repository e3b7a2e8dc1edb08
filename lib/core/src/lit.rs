use std::fmt::{Display, Formatter};
use std::ops::Neg;

/// Solver-agnostic literal in DIMACS convention: `v` or `-v` for a 1-based variable `v`.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct Lit(i32);

impl Lit {
    pub const fn new(val: i32) -> Self {
        assert!(val != 0, "literal must not be zero");
        Lit(val)
    }

    /// Positive literal of the 1-based variable `var`.
    pub const fn positive(var: u32) -> Self {
        Self::new(var as i32)
    }

    pub const fn negative(var: u32) -> Self {
        Self::new(-(var as i32))
    }

    pub const fn get(self) -> i32 {
        self.0
    }

    pub const fn var(self) -> u32 {
        self.get().unsigned_abs()
    }

    pub const fn sign(self) -> i32 {
        self.get().signum()
    }

    pub const fn is_negated(self) -> bool {
        self.get() < 0
    }
}

impl Display for Lit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl<L> From<&L> for Lit
where
    L: Into<Lit> + Copy,
{
    fn from(val: &L) -> Self {
        (*val).into()
    }
}

impl From<i32> for Lit {
    fn from(val: i32) -> Self {
        Self::new(val)
    }
}

impl From<Lit> for i32 {
    fn from(lit: Lit) -> Self {
        lit.get()
    }
}

impl Neg for Lit {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::*;

    #[test]
    fn test_lit_parts() {
        let lit = Lit::new(-42);
        assert_eq!(lit.get(), -42);
        assert_eq!(lit.var(), 42);
        assert_eq!(lit.sign(), -1);
        assert!(lit.is_negated());
        assert_eq!(Lit::negative(42), lit);
        assert_eq!(-Lit::positive(42), lit);
    }

    #[test]
    fn test_lit_conversions() {
        let lit: Lit = (&7).into();
        assert_eq!(lit, Lit::new(7));
        let value: i32 = (-lit).into();
        assert_eq!(value, -7);
        assert_eq!(format!("{}", -lit), "-7");
    }

    #[test]
    #[should_panic]
    fn test_zero_literal_panics() {
        let _ = Lit::new(0);
    }

    #[quickcheck]
    fn double_negation_is_identity(x: i32) -> bool {
        if x == 0 || x == i32::MIN {
            return true;
        }
        let lit = Lit::new(x);
        -(-lit) == lit && (-lit).var() == lit.var()
    }
}
