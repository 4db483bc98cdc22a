//! Interned symbols.
//!
//! Symbols live in a single process-wide table and are never freed, so a
//! [`Symbol`] is just a `'static` reference into that table. Two symbols are
//! the same symbol iff they point at the same entry, which lets the compiler
//! key its tables on symbol identity instead of comparing names.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU32, Ordering};

use once_cell::sync::Lazy;
use parking_lot::Mutex;

pub struct SymbolData {
    name: Box<str>,
}

#[derive(Clone, Copy)]
pub struct Symbol(&'static SymbolData);

static SYMBOLS: Lazy<Mutex<HashMap<&'static str, Symbol>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Returns the unique symbol named `name`, creating it on first use.
pub fn intern(name: &str) -> Symbol {
    let mut table = SYMBOLS.lock();

    if let Some(symbol) = table.get(name) {
        return *symbol;
    }

    let data: &'static SymbolData = Box::leak(Box::new(SymbolData { name: name.into() }));
    let key: &'static str = &data.name;
    let symbol = Symbol(data);
    table.insert(key, symbol);
    symbol
}

impl Symbol {
    pub fn name(&self) -> &'static str {
        &self.0.name
    }

    /// Is this symbol a keyword argument marker, i.e. `key:`?
    ///
    /// A lone `:` is an ordinary symbol.
    pub fn is_keyword_marker(&self) -> bool {
        let name = self.name();
        name.len() > 1 && name.ends_with(':')
    }

    /// `key:` -> `key`, interned.
    pub fn sans_colon(&self) -> Symbol {
        let name = self.name();
        match name.strip_suffix(':') {
            Some(stripped) => intern(stripped),
            None => *self,
        }
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_usize(self.0 as *const SymbolData as usize)
    }
}

impl std::fmt::Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.name())
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::ops::Deref for Symbol {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.name()
    }
}

pub trait Intern {
    fn intern(&self) -> Symbol;
}

impl Intern for str {
    fn intern(&self) -> Symbol {
        intern(self)
    }
}

impl Intern for String {
    fn intern(&self) -> Symbol {
        intern(self)
    }
}

impl Intern for Symbol {
    fn intern(&self) -> Symbol {
        *self
    }
}

impl<T: Intern + ?Sized> Intern for &T {
    fn intern(&self) -> Symbol {
        (**self).intern()
    }
}

/// Opaque token naming the macro-expansion environment a syntax symbol came
/// from. Only identity matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HygieneContext(u32);

impl HygieneContext {
    pub fn fresh() -> Self {
        static COUNT: AtomicU32 = AtomicU32::new(0);
        Self(COUNT.fetch_add(1, Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn distinct_names_are_distinct_symbols() {
        assert_ne!(intern("a"), intern("b"));
        assert_eq!(intern("a").name(), "a");
    }

    #[test]
    fn keyword_markers() {
        assert!(intern("key:").is_keyword_marker());
        assert!(!intern(":").is_keyword_marker());
        assert!(!intern("key").is_keyword_marker());
        assert_eq!(intern("key:").sans_colon(), intern("key"));
        assert_eq!(intern("a::").sans_colon(), intern("a:"));
    }

    #[test]
    fn hygiene_contexts_are_unique() {
        let a = HygieneContext::fresh();
        let b = HygieneContext::fresh();
        assert_ne!(a, b);
    }

    proptest! {
        #[test]
        fn interning_twice_yields_same_symbol(s in ".*") {
            let a = intern(&s);
            let b = s.intern();
            prop_assert!(std::ptr::eq(a.0, b.0));
        }

        #[test]
        fn different_names_yield_different_symbols(a in "[a-z]{1,8}", b in "[A-Z]{1,8}") {
            prop_assert_ne!(intern(&a), intern(&b));
        }
    }
}
