use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SolveResponse {
    Sat,
    Unsat,
    Unknown,
}

impl SolveResponse {
    /// Exit code used by SAT competition tools.
    pub fn exit_code(self) -> i32 {
        match self {
            SolveResponse::Sat => 10,
            SolveResponse::Unsat => 20,
            SolveResponse::Unknown => 0,
        }
    }
}

impl Display for SolveResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use SolveResponse::*;
        match self {
            Sat => write!(f, "SAT"),
            Unsat => write!(f, "UNSAT"),
            Unknown => write!(f, "UNKNOWN"),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LitValue {
    True,
    False,
    DontCare,
}

impl LitValue {
    pub fn bool(&self) -> bool {
        use LitValue::*;
        match self {
            True => true,
            False => false,
            DontCare => panic!("DontCare can't be converted to bool!"),
        }
    }
}

impl From<bool> for LitValue {
    fn from(b: bool) -> Self {
        if b {
            LitValue::True
        } else {
            LitValue::False
        }
    }
}

impl Display for LitValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use LitValue::*;
        match self {
            True => write!(f, "1"),
            False => write!(f, "0"),
            DontCare => write!(f, "X"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(SolveResponse::Sat.exit_code(), 10);
        assert_eq!(SolveResponse::Unsat.exit_code(), 20);
        assert_eq!(SolveResponse::Unknown.exit_code(), 0);
    }

    #[test]
    fn test_lit_value() {
        assert!(LitValue::from(true).bool());
        assert_eq!(format!("{}", LitValue::False), "0");
        assert_eq!(format!("{}", LitValue::DontCare), "X");
    }
}
