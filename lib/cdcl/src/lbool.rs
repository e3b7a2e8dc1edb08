use std::ops::BitXor;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum LBool {
    False = 0,
    True = 1,
    Undef = 2,
}

impl LBool {
    #[inline]
    pub const fn is_undef(self) -> bool {
        matches!(self, LBool::Undef)
    }

    #[inline]
    pub const fn is_true(self) -> bool {
        matches!(self, LBool::True)
    }

    #[inline]
    pub const fn is_false(self) -> bool {
        matches!(self, LBool::False)
    }

    pub const fn to_bool(self) -> Option<bool> {
        match self {
            LBool::False => Some(false),
            LBool::True => Some(true),
            LBool::Undef => None,
        }
    }
}

impl Default for LBool {
    fn default() -> Self {
        LBool::Undef
    }
}

impl From<bool> for LBool {
    fn from(b: bool) -> Self {
        if b {
            LBool::True
        } else {
            LBool::False
        }
    }
}

// LBool ^ bool
impl BitXor<bool> for LBool {
    type Output = LBool;

    #[inline]
    fn bitxor(self, rhs: bool) -> Self::Output {
        match (self, rhs) {
            (LBool::Undef, _) => LBool::Undef,
            (v, false) => v,
            (LBool::True, true) => LBool::False,
            (LBool::False, true) => LBool::True,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lbool_bitxor() {
        assert_eq!(LBool::False ^ false, LBool::False);
        assert_eq!(LBool::False ^ true, LBool::True);
        assert_eq!(LBool::True ^ false, LBool::True);
        assert_eq!(LBool::True ^ true, LBool::False);
        assert_eq!(LBool::Undef ^ false, LBool::Undef);
        assert_eq!(LBool::Undef ^ true, LBool::Undef);
    }

    #[test]
    fn lbool_to_bool() {
        assert_eq!(LBool::True.to_bool(), Some(true));
        assert_eq!(LBool::False.to_bool(), Some(false));
        assert_eq!(LBool::Undef.to_bool(), None);
        assert_eq!(LBool::default(), LBool::Undef);
    }
}
