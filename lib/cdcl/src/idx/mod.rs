use num_traits::AsPrimitive;

pub use self::idx_heap::IdxHeap;
pub use self::idx_vec::IdxVec;

use crate::lit::Lit;
use crate::var::Var;

pub mod idx_heap;
pub mod idx_vec;

pub type VarVec<V> = IdxVec<Var, V>;
pub type LitVec<V> = IdxVec<Lit, V>;
pub type VarHeap = IdxHeap<Var>;

/// Dense key usable as a vector index.
pub trait Idx {
    fn idx(&self) -> usize;
}

impl Idx for Var {
    fn idx(&self) -> usize {
        self.index()
    }
}

impl Idx for Lit {
    fn idx(&self) -> usize {
        self.index()
    }
}

macro_rules! impl_idx_for_num {
    ($($t:ty),*) => {
        $(
            impl Idx for $t {
                fn idx(&self) -> usize {
                    AsPrimitive::<usize>::as_(*self)
                }
            }
        )*
    };
}

impl_idx_for_num!(u8, u16, u32, u64, usize);
