//! Parser context flags.

bitflags::bitflags! {
    /// Grammar parameters that change how tokens are interpreted.
    ///
    /// Saved and restored around every function, class member and
    /// parenthesised region that changes them.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ContextFlags: u32 {
        /// `await` is an operator.
        const ASYNC = 1 << 0;
        /// `yield` is an operator.
        const GENERATOR = 1 << 1;
        /// `in` is not a binary operator (`for` heads).
        const DISALLOW_IN = 1 << 2;
        /// `return` is allowed.
        const IN_FUNCTION = 1 << 3;
        /// Inside `static { }`; `await` is reserved.
        const STATIC_BLOCK = 1 << 4;
    }
}
