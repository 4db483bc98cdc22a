//! Staged bootstrap of the runtime.
//!
//! Phases run in a fixed order: declare classes, declare generic functions,
//! register the built-in methods. Nothing may be sent before the last phase
//! finishes.

use super::class::ClassId;
use super::generic::GenericId;
use super::{methods, Runtime};
use crate::EllResult;

/// Built-in classes.
#[derive(Debug, Clone, Copy)]
pub struct CoreClasses {
    pub object: ClassId,
    pub nil: ClassId,
    pub symbol: ClassId,
    pub string: ClassId,
    pub number: ClassId,
    pub closure: ClassId,
    pub class: ClassId,
    pub generic: ClassId,
    pub syntax: ClassId,
    pub stx_sym: ClassId,
    pub stx_str: ClassId,
    pub stx_num: ClassId,
    pub stx_lst: ClassId,
}

/// Built-in generic functions.
#[derive(Debug, Clone, Copy)]
pub struct CoreGenerics {
    pub add: GenericId,
    pub first: GenericId,
    pub second: GenericId,
    pub third: GenericId,
    pub fourth: GenericId,
    pub print_object: GenericId,
}

#[derive(Debug, Clone, Copy)]
pub struct Core {
    pub classes: CoreClasses,
    pub generics: CoreGenerics,
}

pub fn bootstrap(rt: &mut Runtime) -> EllResult<()> {
    if rt.core().is_ok() {
        return Err(crate::error::EllError::Boot("runtime is already bootstrapped"));
    }

    let classes = declare_classes(rt);
    log::debug!("bootstrap: declared core classes");

    let generics = declare_generics(rt);
    log::debug!("bootstrap: declared core generics");

    let core = Core { classes, generics };
    methods::register_methods(rt, &core);
    log::debug!("bootstrap: registered built-in methods");

    rt.set_core(core)
}

fn declare_classes(rt: &mut Runtime) -> CoreClasses {
    let object = rt.define_class("<object>", &[]);
    let syntax = rt.define_class("<syntax>", &[object]);

    CoreClasses {
        object,
        nil: rt.define_class("<nil>", &[object]),
        symbol: rt.define_class("<symbol>", &[object]),
        string: rt.define_class("<string>", &[object]),
        number: rt.define_class("<number>", &[object]),
        closure: rt.define_class("<closure>", &[object]),
        class: rt.define_class("<class>", &[object]),
        generic: rt.define_class("<generic-function>", &[object]),
        syntax,
        stx_sym: rt.define_class("<syntax-symbol>", &[syntax]),
        stx_str: rt.define_class("<syntax-string>", &[syntax]),
        stx_num: rt.define_class("<syntax-number>", &[syntax]),
        stx_lst: rt.define_class("<syntax-list>", &[syntax]),
    }
}

fn declare_generics(rt: &mut Runtime) -> CoreGenerics {
    CoreGenerics {
        add: rt.make_generic("add"),
        first: rt.make_generic("first"),
        second: rt.make_generic("second"),
        third: rt.make_generic("third"),
        fourth: rt.make_generic("fourth"),
        print_object: rt.make_generic("print-object"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EllError;

    #[test]
    fn bootstrap_runs_once() {
        let mut rt = Runtime::boot().unwrap();
        assert!(matches!(bootstrap(&mut rt), Err(EllError::Boot(_))));
    }

    #[test]
    fn core_classes_hang_off_object() {
        let rt = Runtime::boot().unwrap();
        let c = rt.core().unwrap().classes;
        assert!(rt.is_subclass(c.stx_lst, c.syntax));
        assert!(rt.is_subclass(c.stx_sym, c.object));
        assert!(!rt.is_subclass(c.symbol, c.syntax));
        assert_eq!(rt.find_class("<syntax-list>"), Some(c.stx_lst));
        assert_eq!(rt.find_generic("print-object"), Some(rt.core().unwrap().generics.print_object));
    }
}
