//! Lock compatibility.
//!
//! The relation is not symmetric. `compatible(requested, held)` answers whether a transaction
//! may be granted `requested` while another transaction holds `held` on the same table.
//!
//! | requested                        | compatible with held             |
//! |----------------------------------|----------------------------------|
//! | `r`, `ir`                        | `r`, `w`, `u`, `ir`, `iw`, `iu`  |
//! | `w`                              | `r`, `ir`                        |
//! | `iw`                             | `r`, `ir`, `iw`, `iu`            |
//! | `iu`                             | `ir`, `iw`, `iu`                 |
//! | `u`, `c`, `ic`                   | none                             |

use crate::lock::LockMode;

/// Returns `true` if `requested` can be granted alongside `held`.
pub fn compatible(requested: LockMode, held: LockMode) -> bool {
    use LockMode::*;
    match requested {
        Read | IntentRead => matches!(
            held,
            Read | Write | Update | IntentRead | IntentWrite | IntentUpdate
        ),
        Write => matches!(held, Read | IntentRead),
        IntentWrite => matches!(held, Read | IntentRead | IntentWrite | IntentUpdate),
        IntentUpdate => matches!(held, IntentRead | IntentWrite | IntentUpdate),
        Update | Certify | IntentCertify => false,
    }
}

impl LockMode {
    /// The mode taken by a read, or by a read that announces a later write.
    #[inline]
    pub fn read(is_update: bool, is_intent: bool) -> Self {
        match (is_update, is_intent) {
            (false, false) => Self::Read,
            (false, true) => Self::IntentRead,
            (true, false) => Self::Update,
            (true, true) => Self::IntentUpdate,
        }
    }

    #[inline]
    pub fn write(is_intent: bool) -> Self {
        if is_intent {
            Self::IntentWrite
        } else {
            Self::Write
        }
    }

    #[inline]
    pub fn certify(is_intent: bool) -> Self {
        if is_intent {
            Self::IntentCertify
        } else {
            Self::Certify
        }
    }

    #[inline]
    pub fn is_intent(self) -> bool {
        matches!(
            self,
            Self::IntentRead | Self::IntentWrite | Self::IntentUpdate | Self::IntentCertify
        )
    }

    /// Returns the intent variant of this mode. Intent modes map to themselves.
    #[inline]
    pub fn intent(self) -> Self {
        match self {
            Self::Read => Self::IntentRead,
            Self::Write => Self::IntentWrite,
            Self::Update => Self::IntentUpdate,
            Self::Certify => Self::IntentCertify,
            intent => intent,
        }
    }

    /// `r` or `ir`: the locks a commit drops and that block a certify upgrade.
    #[inline]
    pub fn is_read_family(self) -> bool {
        matches!(self, Self::Read | Self::IntentRead)
    }

    /// `w` or `iw`: the locks a commit upgrades to certify locks.
    #[inline]
    pub fn is_write_family(self) -> bool {
        matches!(self, Self::Write | Self::IntentWrite)
    }

    /// Returns the certify variant of a write-family mode. Other modes are returned unchanged.
    #[inline]
    pub fn certified(self) -> Self {
        match self {
            Self::Write => Self::Certify,
            Self::IntentWrite => Self::IntentCertify,
            other => other,
        }
    }

    #[inline]
    pub fn is_compatible_with(self, held: LockMode) -> bool {
        compatible(self, held)
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    // Rows are requested modes, columns are held modes, both in declaration order:
    // r w u c ir iw iu ic
    const MATRIX: [[bool; 8]; 8] = {
        const T: bool = true;
        const F: bool = false;
        [
            [T, T, T, F, T, T, T, F], // r
            [T, F, F, F, T, F, F, F], // w
            [F, F, F, F, F, F, F, F], // u
            [F, F, F, F, F, F, F, F], // c
            [T, T, T, F, T, T, T, F], // ir
            [T, F, F, F, T, T, T, F], // iw
            [F, F, F, F, T, T, T, F], // iu
            [F, F, F, F, F, F, F, F], // ic
        ]
    };

    #[test]
    fn test_full_matrix() {
        for (i, requested) in LockMode::iter().enumerate() {
            for (j, held) in LockMode::iter().enumerate() {
                assert_eq!(
                    compatible(requested, held),
                    MATRIX[i][j],
                    "requested {requested}, held {held}"
                );
            }
        }
    }

    #[test]
    fn test_not_symmetric() {
        assert!(compatible(LockMode::Read, LockMode::Update));
        assert!(!compatible(LockMode::Update, LockMode::Read));
        assert!(compatible(LockMode::IntentWrite, LockMode::Read));
        assert!(!compatible(LockMode::Write, LockMode::IntentWrite));
    }

    #[test]
    fn test_constructors() {
        assert_eq!(LockMode::read(false, false), LockMode::Read);
        assert_eq!(LockMode::read(false, true), LockMode::IntentRead);
        assert_eq!(LockMode::read(true, false), LockMode::Update);
        assert_eq!(LockMode::read(true, true), LockMode::IntentUpdate);
        assert_eq!(LockMode::write(false), LockMode::Write);
        assert_eq!(LockMode::write(true), LockMode::IntentWrite);
        assert_eq!(LockMode::certify(false), LockMode::Certify);
        assert_eq!(LockMode::certify(true), LockMode::IntentCertify);
    }

    #[test]
    fn test_helpers() {
        for mode in LockMode::iter() {
            assert!(mode.intent().is_intent());
            assert_eq!(mode.is_intent(), mode.intent() == mode);
        }
        assert_eq!(LockMode::Write.certified(), LockMode::Certify);
        assert_eq!(LockMode::IntentWrite.certified(), LockMode::IntentCertify);
        assert_eq!(LockMode::Certify.certified(), LockMode::Certify);
        assert!(LockMode::IntentRead.is_read_family());
        assert!(!LockMode::Update.is_read_family());
        assert!(LockMode::IntentWrite.is_write_family());
        assert!(!LockMode::Certify.is_write_family());
    }
}
