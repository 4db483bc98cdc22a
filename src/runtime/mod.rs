//! Object & dispatch runtime.
//!
//! Classes form a DAG of superclasses and every class owns one wrapper.
//! Generic functions hold `(specializers, closure)` entries and `send` runs
//! the first entry whose specializers accept the arguments' classes.
//!
//! All classes, generics and built-in methods are registered by
//! [`init::bootstrap`] before anything is sent.

use std::rc::Rc;

use indexmap::IndexMap;
use once_cell::unsync::OnceCell;

pub mod class;
pub mod closure;
pub mod generic;
pub mod init;
pub mod methods;

use self::class::{Class, ClassId, Wrapper, WrapperId};
use self::closure::{check_layout, flatten_args, Callable, Closure};
use self::generic::{GenericFunction, GenericId, MethodEntry};
use self::init::Core;
use crate::data::symbol::{Intern, Symbol};
use crate::data::syntax::Syntax;
use crate::data::value::{Instance, Value};
use crate::error::{CallError, EllError};
use crate::EllResult;

/// Sends `generic` to `rcv` with extra positional arguments.
#[macro_export]
macro_rules! send {
    ($rt: expr, $generic: expr, $rcv: expr $(, $arg: expr)*) => {{
        let args = [$crate::data::value::Value::from($rcv) $(, $crate::data::value::Value::from($arg))*];
        $crate::runtime::Dispatch::send_raw($rt, $generic, args.len(), 0, &args)
    }};
}

/// Something whose class can be found, through its wrapper.
pub trait HasClass {
    fn wrapper(&self, rt: &Runtime) -> EllResult<WrapperId>;
}

/// Anything that can run a generic function against a flat argument array.
pub trait Dispatch {
    fn send_raw(
        &self,
        generic: GenericId,
        npos: usize,
        nkey: usize,
        args: &[Value],
    ) -> EllResult<Value>;

    /// `receiver` is argument zero; `keywords` follow the positionals as
    /// key/value pairs.
    fn send(
        &self,
        generic: GenericId,
        receiver: &Value,
        positional: &[Value],
        keywords: &[(Symbol, Value)],
    ) -> EllResult<Value> {
        let mut all = Vec::with_capacity(positional.len() + 1);
        all.push(receiver.clone());
        all.extend(positional.iter().cloned());
        let args = flatten_args(&all, keywords);
        self.send_raw(generic, all.len(), keywords.len(), &args)
    }
}

pub struct Runtime {
    classes: Vec<Class>,
    wrappers: Vec<Wrapper>,
    generics: Vec<GenericFunction>,
    class_names: IndexMap<Symbol, ClassId>,
    generic_names: IndexMap<Symbol, GenericId>,
    core: OnceCell<Core>,
}

impl Runtime {
    /// An empty registry. Nothing built in is usable until [`init::bootstrap`]
    /// has run; see [`Runtime::boot`].
    pub fn new() -> Self {
        Self {
            classes: Vec::new(),
            wrappers: Vec::new(),
            generics: Vec::new(),
            class_names: IndexMap::new(),
            generic_names: IndexMap::new(),
            core: OnceCell::new(),
        }
    }

    /// A registry with every built-in class, generic and method in place.
    pub fn boot() -> EllResult<Self> {
        let mut rt = Self::new();
        init::bootstrap(&mut rt)?;
        Ok(rt)
    }

    pub fn core(&self) -> EllResult<&Core> {
        self.core
            .get()
            .ok_or(EllError::Boot("runtime is not bootstrapped"))
    }

    pub(crate) fn set_core(&mut self, core: Core) -> EllResult<()> {
        self.core
            .set(core)
            .map_err(|_| EllError::Boot("runtime is already bootstrapped"))
    }

    /* Classes */

    pub fn make_class(&mut self, name: impl Intern) -> ClassId {
        let name = name.intern();
        let id = ClassId(self.classes.len() as u32);
        let wrapper = WrapperId(self.wrappers.len() as u32);
        self.wrappers.push(Wrapper { class: id });
        self.classes.push(Class {
            name,
            supers: Vec::new(),
            wrapper,
        });
        self.class_names.insert(name, id);
        id
    }

    pub fn define_class(&mut self, name: impl Intern, supers: &[ClassId]) -> ClassId {
        let class = self.make_class(name);
        for &sup in supers {
            self.add_superclass(class, sup);
        }
        class
    }

    /// The caller must not introduce a cycle.
    pub fn add_superclass(&mut self, class: ClassId, sup: ClassId) {
        self.classes[class.0 as usize].supers.push(sup);
    }

    pub fn class(&self, id: ClassId) -> &Class {
        &self.classes[id.0 as usize]
    }

    pub fn wrapper(&self, id: WrapperId) -> &Wrapper {
        &self.wrappers[id.0 as usize]
    }

    pub fn find_class(&self, name: impl Intern) -> Option<ClassId> {
        self.class_names.get(&name.intern()).copied()
    }

    /// Reflexive, transitive walk of the superclass DAG.
    pub fn is_subclass(&self, a: ClassId, b: ClassId) -> bool {
        let mut visited = vec![false; self.classes.len()];
        let mut stack = vec![a];

        while let Some(class) = stack.pop() {
            if class == b {
                return true;
            }

            if std::mem::replace(&mut visited[class.0 as usize], true) {
                continue;
            }

            stack.extend(self.class(class).supers.iter().copied());
        }

        false
    }

    pub fn class_of(&self, value: &Value) -> EllResult<ClassId> {
        Ok(self.wrapper(value.wrapper(self)?).class)
    }

    pub fn make_instance(&self, class: ClassId, payload: Value) -> Value {
        Value::Instance(Rc::new(Instance {
            wrapper: self.class(class).wrapper,
            payload,
        }))
    }

    /* Generic functions */

    pub fn make_generic(&mut self, name: impl Intern) -> GenericId {
        let name = name.intern();
        let id = GenericId(self.generics.len() as u32);
        self.generics.push(GenericFunction::new(name));
        self.generic_names.insert(name, id);
        id
    }

    pub fn generic(&self, id: GenericId) -> &GenericFunction {
        &self.generics[id.0 as usize]
    }

    pub fn find_generic(&self, name: impl Intern) -> Option<GenericId> {
        self.generic_names.get(&name.intern()).copied()
    }

    /// Appends a method. An earlier entry with the same specializers is kept
    /// and keeps winning.
    pub fn add_method(
        &mut self,
        generic: GenericId,
        closure: impl Into<Rc<Closure>>,
        specializers: &[ClassId],
    ) {
        self.generics[generic.0 as usize].methods.push(MethodEntry {
            closure: closure.into(),
            specializers: specializers.to_vec(),
        });
    }

    /// Single-dispatch registration: a method specialized on the receiver only.
    pub fn put_method(
        &mut self,
        class: ClassId,
        generic: GenericId,
        closure: impl Into<Rc<Closure>>,
    ) {
        self.add_method(generic, closure, &[class]);
    }

    /// First single-dispatch method applicable to `receiver`.
    pub fn find_method(&self, receiver: &Value, generic: GenericId) -> EllResult<Option<Rc<Closure>>> {
        let wrapper = receiver.wrapper(self)?;

        Ok(self
            .generic(generic)
            .methods
            .iter()
            .find(|entry| {
                entry.specializers.len() == 1 && self.accepts(entry.specializers[0], wrapper)
            })
            .map(|entry| entry.closure.clone()))
    }

    fn accepts(&self, specializer: ClassId, wrapper: WrapperId) -> bool {
        self.class(specializer).wrapper == wrapper
            || self.is_subclass(self.wrapper(wrapper).class, specializer)
    }

    /* Calling */

    pub fn call(&self, callee: &Value, npos: usize, nkey: usize, args: &[Value]) -> EllResult<Value> {
        match callee {
            Value::Closure(clo) => {
                check_layout(npos, nkey, args)?;
                self.call_unchecked(clo, npos, nkey, args)
            }
            other => Err(CallError::NotCallable(other.kind().to_string()).into()),
        }
    }

    pub fn call_unchecked(&self, clo: &Closure, npos: usize, nkey: usize, args: &[Value]) -> EllResult<Value> {
        clo.invoke(self, npos, nkey, args)
    }

    /// Runs `print-object` on `value` and returns the text.
    pub fn print(&self, value: &Value) -> EllResult<String> {
        let printed = send!(self, self.core()?.generics.print_object, value.clone())?;
        Ok(printed.as_str()?.to_string())
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatch for Runtime {
    fn send_raw(
        &self,
        generic: GenericId,
        npos: usize,
        nkey: usize,
        args: &[Value],
    ) -> EllResult<Value> {
        check_layout(npos, nkey, args)?;

        let wrappers = args[..npos]
            .iter()
            .map(|arg| arg.wrapper(self))
            .collect::<EllResult<Vec<_>>>()?;

        let gf = self.generic(generic);

        for (index, entry) in gf.methods.iter().enumerate() {
            if entry.specializers.len() > npos {
                continue;
            }

            let applicable = entry
                .specializers
                .iter()
                .zip(wrappers.iter())
                .all(|(&spec, &wrapper)| self.accepts(spec, wrapper));

            if applicable {
                log::trace!(target: "dispatch", "{} selected method #{}", gf.name, index);
                return self.call_unchecked(&entry.closure, npos, nkey, args);
            }
        }

        Err(EllError::Dispatch {
            generic: gf.name,
            classes: wrappers
                .iter()
                .map(|&w| self.class(self.wrapper(w).class).name)
                .collect(),
        })
    }
}

impl HasClass for Value {
    fn wrapper(&self, rt: &Runtime) -> EllResult<WrapperId> {
        let classes = &rt.core()?.classes;
        let class = match self {
            Value::Instance(instance) => return Ok(instance.wrapper),
            Value::Nil => classes.nil,
            Value::Symbol(_) => classes.symbol,
            Value::Str(_) => classes.string,
            Value::Number(_) => classes.number,
            Value::Syntax(Syntax::Symbol(_)) => classes.stx_sym,
            Value::Syntax(Syntax::String(_)) => classes.stx_str,
            Value::Syntax(Syntax::Number(_)) => classes.stx_num,
            Value::Syntax(Syntax::List(_)) => classes.stx_lst,
            Value::Closure(_) => classes.closure,
            Value::Class(_) => classes.class,
            Value::Generic(_) => classes.generic,
        };

        Ok(rt.class(class).wrapper)
    }
}
