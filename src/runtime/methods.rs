//! Built-in single-dispatch methods: syntax list construction and access,
//! and `print-object` for every core class.

use super::closure::{check_npos, Closure};
use super::init::Core;
use super::Runtime;
use crate::data::syntax::Syntax;
use crate::data::value::Value;
use crate::EllResult;

macro_rules! define_methods {
    ($($class: ident . $msg: ident ($npos: literal) => |$rt: ident, $args: ident| $body: block)*) => {
        paste::paste! {
            $(
                fn [<$class _ $msg>](
                    $rt: &Runtime,
                    _clo: &Closure,
                    npos: usize,
                    _nkey: usize,
                    $args: &[Value],
                ) -> EllResult<Value> {
                    check_npos($npos, npos)?;
                    $body
                }
            )*

            /// Registers every method below, in the order written.
            pub(crate) fn register_methods(rt: &mut Runtime, core: &Core) {
                $(
                    rt.put_method(
                        core.classes.$class,
                        core.generics.$msg,
                        Closure::new([<$class _ $msg>], Value::Nil),
                    );
                )*
            }
        }
    };
}

define_methods! {
    stx_lst.add(2) => |_rt, args| {
        let elt = args[1].clone().into_syntax()?;
        args[0].as_syntax_list()?.push(elt);
        Ok(args[0].clone())
    }

    stx_lst.first(1) => |_rt, args| {
        Ok(args[0].as_syntax_list()?.first()?.into())
    }

    stx_lst.second(1) => |_rt, args| {
        Ok(args[0].as_syntax_list()?.second()?.into())
    }

    stx_lst.third(1) => |_rt, args| {
        Ok(args[0].as_syntax_list()?.third()?.into())
    }

    stx_lst.fourth(1) => |_rt, args| {
        Ok(args[0].as_syntax_list()?.fourth()?.into())
    }

    stx_lst.print_object(1) => |rt, args| {
        let mut out = String::from("(");
        for elt in args[0].as_syntax_list()?.elements() {
            out.push_str(&rt.print(&Value::Syntax(elt))?);
            out.push(' ');
        }
        out.push(')');
        Ok(Value::string(&out))
    }

    stx_sym.print_object(1) => |_rt, args| {
        match &args[0] {
            Value::Syntax(Syntax::Symbol(sym)) => Ok(Value::string(sym.symbol.name())),
            other => Err(crate::error::EllError::identity("syntax symbol", other.kind())),
        }
    }

    stx_str.print_object(1) => |_rt, args| {
        Ok(Value::string(&args[0].clone().into_syntax()?.to_string()))
    }

    stx_num.print_object(1) => |_rt, args| {
        Ok(Value::string(&args[0].clone().into_syntax()?.to_string()))
    }

    symbol.print_object(1) => |_rt, args| {
        Ok(Value::string(args[0].as_symbol()?.name()))
    }

    string.print_object(1) => |_rt, args| {
        Ok(args[0].clone())
    }

    number.print_object(1) => |_rt, args| {
        match &args[0] {
            Value::Number(n) => Ok(Value::string(&n.to_string())),
            other => Err(crate::error::EllError::identity("number", other.kind())),
        }
    }

    nil.print_object(1) => |_rt, _args| {
        Ok(Value::string("nil"))
    }

    object.print_object(1) => |rt, args| {
        let class = rt.class(rt.class_of(&args[0])?);
        Ok(Value::string(&format!("#<{}>", class.name)))
    }
}
