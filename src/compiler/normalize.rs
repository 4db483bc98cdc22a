//! Normalization: syntax objects -> canonical AST.
//!
//! A symbol is a variable reference. A list is looked up by its head symbol
//! in the special form table; anything not found there is an ordinary
//! application of a function. Every list access goes through the runtime's
//! `first`..`fourth` generics.

use std::collections::HashMap;

use super::ast::{Args, Ast, Identifier, Namespace};
use super::dissect::{parameter_markers, Group};
use crate::data::symbol::{intern, Symbol};
use crate::data::syntax::{Syntax, SyntaxList};
use crate::error::EllError;
use crate::runtime::init::CoreGenerics;
use crate::runtime::Runtime;
use crate::send;
use crate::EllResult;

pub type Special = fn(&Normalizer, &SyntaxList) -> EllResult<Ast>;

/// Special form table, keyed by head symbol. Built by [`Normalizer::new`]
/// and never changed afterwards.
fn special_forms() -> HashMap<Symbol, Special> {
    let mut table: HashMap<Symbol, Special> = HashMap::new();

    macro_rules! define_special {
        ($name: literal, $rname: ident, $norm: ident, $form: ident => $b: block) => {
            fn $rname($norm: &Normalizer, $form: &SyntaxList) -> EllResult<Ast> {
                $b
            }

            table.insert(intern($name), $rname);
        };
    }

    define_special!("fref", norm_fref, norm, form => {
        form.assert_len(2)?;
        norm.make_ref(&norm.second(form)?, Namespace::Function)
    });

    define_special!("def", norm_def, norm, form => {
        norm.make_def(form, Namespace::Variable)
    });

    define_special!("fdef", norm_fdef, norm, form => {
        norm.make_def(form, Namespace::Function)
    });

    define_special!("set", norm_set, norm, form => {
        norm.make_set(form, Namespace::Variable)
    });

    // Assigns in the variable namespace, same as `set`.
    define_special!("fset", norm_fset, norm, form => {
        norm.make_set(form, Namespace::Variable)
    });

    define_special!("if", norm_cond, norm, form => {
        form.assert_len(4)?;
        Ok(Ast::Cond {
            test: Box::new(norm.normalize(&norm.second(form)?)?),
            consequent: Box::new(norm.normalize(&norm.third(form)?)?),
            alternative: Box::new(norm.normalize(&norm.fourth(form)?)?),
        })
    });

    define_special!("progn", norm_seq, norm, form => {
        form.assert_len_min(1)?;
        let exprs = form
            .tail(1)
            .iter()
            .map(|stx| norm.normalize(stx))
            .collect::<EllResult<Vec<_>>>()?;
        Ok(Ast::Seq(exprs))
    });

    define_special!("funcall", norm_app, norm, form => {
        form.assert_len_min(2)?;
        let op = norm.normalize(&norm.second(form)?)?;
        norm.make_app(op, &form.tail(2))
    });

    define_special!("lambda", norm_lam, norm, form => {
        form.assert_len(3)?;
        let params_stx = norm.second(form)?;
        let params = norm.dissect_params(&params_stx.as_list()?.elements())?;
        let body = norm.normalize(&norm.third(form)?)?;
        Ok(Ast::Lam(Box::new(params), Box::new(body)))
    });

    table
}

pub struct Normalizer<'rt> {
    rt: &'rt Runtime,
    generics: CoreGenerics,
    specials: HashMap<Symbol, Special>,
    pub(super) markers: [(Symbol, Group); 4],
}

impl<'rt> Normalizer<'rt> {
    pub fn new(rt: &'rt Runtime) -> EllResult<Self> {
        let generics = rt.core()?.generics;
        let specials = special_forms();
        log::debug!("normalizer: installed {} special forms", specials.len());

        Ok(Self {
            rt,
            generics,
            specials,
            markers: parameter_markers(),
        })
    }

    pub fn is_special_form(&self, symbol: Symbol) -> bool {
        self.specials.contains_key(&symbol)
    }

    pub fn normalize(&self, stx: &Syntax) -> EllResult<Ast> {
        match stx {
            Syntax::Symbol(sym) => Ok(Ast::var_ref(sym.symbol)),
            Syntax::List(list) => self.normalize_list(list),
            other => Err(EllError::identity("syntax symbol or list", other.describe())),
        }
    }

    fn normalize_list(&self, list: &SyntaxList) -> EllResult<Ast> {
        let op = self.first(list)?.as_symbol()?;

        match self.specials.get(&op) {
            Some(special) => {
                log::trace!(target: "normalize", "special form {}", op);
                special(self, list)
            }
            None => self.norm_ordinary_app(list),
        }
    }

    /// `(f arg ...)` where `f` is not a special form.
    fn norm_ordinary_app(&self, list: &SyntaxList) -> EllResult<Ast> {
        list.assert_len_min(1)?;
        let op = self.first(list)?.as_symbol()?;
        log::trace!(target: "normalize", "application of {}", op);
        self.make_app(Ast::fun_ref(op), &list.tail(1))
    }

    /// Normalizes every element of the top-level list, in order.
    pub fn normalize_program(&self, root: &SyntaxList) -> EllResult<Vec<Ast>> {
        let forms = root.elements();
        log::debug!("normalizing {} top-level forms", forms.len());
        forms.iter().map(|stx| self.normalize(stx)).collect()
    }

    /// Like [`Normalizer::normalize_program`] but keeps going after a form
    /// fails.
    pub fn normalize_each(&self, root: &SyntaxList) -> Vec<EllResult<Ast>> {
        root.elements()
            .iter()
            .map(|stx| self.normalize(stx))
            .collect()
    }

    fn make_ref(&self, stx: &Syntax, ns: Namespace) -> EllResult<Ast> {
        Ok(Ast::Ref(Identifier::new(stx.as_symbol()?, ns)))
    }

    fn make_def(&self, form: &SyntaxList, ns: Namespace) -> EllResult<Ast> {
        form.assert_len(3)?;
        let id = Identifier::new(self.second(form)?.as_symbol()?, ns);
        let value = self.normalize(&self.third(form)?)?;
        Ok(Ast::Def(id, Box::new(value)))
    }

    fn make_set(&self, form: &SyntaxList, ns: Namespace) -> EllResult<Ast> {
        form.assert_len(3)?;
        let id = Identifier::new(self.second(form)?.as_symbol()?, ns);
        let value = self.normalize(&self.third(form)?)?;
        Ok(Ast::Set(id, Box::new(value)))
    }

    fn make_app(&self, op: Ast, args: &[Syntax]) -> EllResult<Ast> {
        let args: Args = self.dissect_args(args)?;
        Ok(Ast::App(Box::new(op), args))
    }

    pub(super) fn first(&self, list: &SyntaxList) -> EllResult<Syntax> {
        send!(self.rt, self.generics.first, list.clone())?.into_syntax()
    }

    pub(super) fn second(&self, list: &SyntaxList) -> EllResult<Syntax> {
        send!(self.rt, self.generics.second, list.clone())?.into_syntax()
    }

    pub(super) fn third(&self, list: &SyntaxList) -> EllResult<Syntax> {
        send!(self.rt, self.generics.third, list.clone())?.into_syntax()
    }

    pub(super) fn fourth(&self, list: &SyntaxList) -> EllResult<Syntax> {
        send!(self.rt, self.generics.fourth, list.clone())?.into_syntax()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Arity;
    use crate::reader::read;

    fn normalize_str(src: &str) -> EllResult<Ast> {
        let rt = Runtime::boot()?;
        let norm = Normalizer::new(&rt)?;
        let root = read(&rt, src)?;
        norm.normalize(&root.first()?)
    }

    fn sym(name: &str) -> Symbol {
        intern(name)
    }

    fn var(name: &str) -> Ast {
        Ast::var_ref(sym(name))
    }

    #[test]
    fn symbol_is_variable_reference() {
        assert_eq!(normalize_str("x").unwrap(), var("x"));
    }

    #[test]
    fn strings_and_numbers_do_not_normalize() {
        assert!(normalize_str("\"text\"").unwrap_err().is_identity());

        let rt = Runtime::boot().unwrap();
        let norm = Normalizer::new(&rt).unwrap();
        assert!(norm.normalize(&Syntax::number(1)).unwrap_err().is_identity());
    }

    #[test]
    fn function_reference() {
        assert_eq!(normalize_str("(fref f)").unwrap(), Ast::fun_ref(sym("f")));
        assert!(normalize_str("(fref f g)").unwrap_err().is_shape());
        assert!(normalize_str("(fref (f))").unwrap_err().is_identity());
    }

    #[test]
    fn definitions_keep_their_namespace() {
        assert_eq!(
            normalize_str("(def x y)").unwrap(),
            Ast::Def(Identifier::variable(sym("x")), Box::new(var("y")))
        );
        assert_eq!(
            normalize_str("(fdef f y)").unwrap(),
            Ast::Def(Identifier::function(sym("f")), Box::new(var("y")))
        );
        assert!(normalize_str("(def x)").unwrap_err().is_shape());
    }

    #[test]
    fn assignments_both_land_in_the_variable_namespace() {
        assert_eq!(
            normalize_str("(set x y)").unwrap(),
            Ast::Set(Identifier::variable(sym("x")), Box::new(var("y")))
        );
        // Observed behaviour: `fset` does not use the function namespace.
        assert_eq!(
            normalize_str("(fset f y)").unwrap(),
            Ast::Set(Identifier::variable(sym("f")), Box::new(var("y")))
        );
        assert!(normalize_str("(fset f y z)").unwrap_err().is_shape());
    }

    #[test]
    fn conditional_needs_all_three_parts() {
        match normalize_str("(if t c)") {
            Err(EllError::Shape {
                expected, found, ..
            }) => {
                assert_eq!(expected, Arity::Exactly(4));
                assert_eq!(found, 3);
            }
            other => panic!("expected shape error, got {:?}", other),
        }

        assert_eq!(
            normalize_str("(if t c a)").unwrap(),
            Ast::Cond {
                test: Box::new(var("t")),
                consequent: Box::new(var("c")),
                alternative: Box::new(var("a")),
            }
        );
    }

    #[test]
    fn sequences() {
        assert_eq!(normalize_str("(progn)").unwrap(), Ast::Seq(vec![]));
        assert_eq!(
            normalize_str("(progn a (f b))").unwrap(),
            Ast::Seq(vec![
                var("a"),
                Ast::App(
                    Box::new(Ast::fun_ref(sym("f"))),
                    Args {
                        pos: vec![var("b")],
                        ..Args::default()
                    }
                ),
            ])
        );
    }

    #[test]
    fn ordinary_application_uses_function_namespace() {
        let mut key = indexmap::IndexMap::new();
        key.insert(sym("key"), var("1"));

        assert_eq!(
            normalize_str("(f x key: 1 y)").unwrap(),
            Ast::App(
                Box::new(Ast::fun_ref(sym("f"))),
                Args {
                    pos: vec![var("x"), var("y")],
                    key,
                }
            )
        );
    }

    #[test]
    fn explicit_application_normalizes_its_operator() {
        assert_eq!(
            normalize_str("(funcall g x)").unwrap(),
            Ast::App(
                Box::new(var("g")),
                Args {
                    pos: vec![var("x")],
                    ..Args::default()
                }
            )
        );
        assert_eq!(
            normalize_str("(funcall (fref g))").unwrap(),
            Ast::App(Box::new(Ast::fun_ref(sym("g"))), Args::default())
        );
        assert!(normalize_str("(funcall)").unwrap_err().is_shape());
    }

    #[test]
    fn head_must_be_a_symbol() {
        assert!(normalize_str("((f) x)").unwrap_err().is_identity());
        assert!(normalize_str("(\"f\" x)").unwrap_err().is_identity());
    }

    #[test]
    fn empty_list_is_a_shape_error() {
        assert!(normalize_str("()").unwrap_err().is_shape());
    }

    #[test]
    fn abstraction() {
        match normalize_str("(lambda (a b) (f a))").unwrap() {
            Ast::Lam(params, body) => {
                assert_eq!(params.req.len(), 2);
                assert_eq!(params.req[1].id, Identifier::variable(sym("b")));
                assert!(matches!(*body, Ast::App(..)));
            }
            other => panic!("expected abstraction, got {:?}", other),
        }

        assert!(normalize_str("(lambda a b)").unwrap_err().is_identity());
        assert!(normalize_str("(lambda (a))").unwrap_err().is_shape());
    }

    #[test]
    fn special_forms_are_installed_by_new() {
        let rt = Runtime::boot().unwrap();
        let norm = Normalizer::new(&rt).unwrap();

        for name in [
            "fref", "def", "fdef", "set", "fset", "if", "progn", "funcall", "lambda",
        ] {
            assert!(norm.is_special_form(sym(name)), "{} is not installed", name);
        }
        assert!(!norm.is_special_form(sym("If")));
        assert!(!norm.is_special_form(sym("f")));
    }

    #[test]
    fn program_normalization() {
        let rt = Runtime::boot().unwrap();
        let norm = Normalizer::new(&rt).unwrap();

        let root = read(&rt, "(def x y) (f x) z").unwrap();
        let asts = norm.normalize_program(&root).unwrap();
        assert_eq!(asts.len(), 3);
        assert_eq!(asts[2], var("z"));

        let root = read(&rt, "(if a) (f x) (def)").unwrap();
        assert!(norm.normalize_program(&root).unwrap_err().is_shape());

        let results = norm.normalize_each(&root);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_err());
        assert!(results[1].is_ok());
        assert!(results[2].is_err());
    }

    #[test]
    fn normalizer_needs_a_bootstrapped_runtime() {
        let rt = Runtime::new();
        assert!(matches!(Normalizer::new(&rt), Err(EllError::Boot(_))));
    }
}
