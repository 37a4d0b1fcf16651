use crate::types::Money;

/// A named group of raw monetary accounts (e.g. current assets).
///
/// Account names are the camelCase wire names used by custom edits and by
/// serialised statements, so `account_mut("accountsReceivable")` resolves to
/// the same field that serialises under that key.
pub trait AccountGroup {
    /// Account names in presentation order.
    fn names(&self) -> &'static [&'static str];

    fn account(&self, name: &str) -> Option<Money>;

    fn account_mut(&mut self, name: &str) -> Option<&mut Money>;

    fn contains(&self, name: &str) -> bool {
        self.account(name).is_some()
    }

    /// `(name, amount)` pairs in presentation order.
    fn entries(&self) -> Vec<(&'static str, Money)> {
        self.names()
            .iter()
            .filter_map(|name| self.account(name).map(|amount| (*name, amount)))
            .collect()
    }

    /// Sum of every account; `None` if it does not fit in a `Money`.
    fn total(&self) -> Option<Money> {
        self.entries()
            .into_iter()
            .try_fold(Money::ZERO, |acc, (_, amount)| acc.checked_add(amount))
    }
}

/// Implements [`AccountGroup`] for a struct whose fields are all `Money`,
/// pairing each field with its wire name.
macro_rules! account_group {
    ($ty:ty { $($field:ident => $name:literal),+ $(,)? }) => {
        impl $crate::statements::accounts::AccountGroup for $ty {
            fn names(&self) -> &'static [&'static str] {
                &[$($name),+]
            }

            fn account(&self, name: &str) -> Option<$crate::types::Money> {
                match name {
                    $($name => Some(self.$field),)+
                    _ => None,
                }
            }

            fn account_mut(&mut self, name: &str) -> Option<&mut $crate::types::Money> {
                match name {
                    $($name => Some(&mut self.$field),)+
                    _ => None,
                }
            }
        }
    };
}

pub(crate) use account_group;
