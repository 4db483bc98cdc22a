//! Splitting flat call argument and lambda parameter lists into their
//! structured forms.

use super::ast::{Args, Identifier, Param, Params};
use super::normalize::Normalizer;
use crate::data::symbol::{intern, Symbol};
use crate::data::syntax::Syntax;
use crate::error::{Dissection, EllError};
use crate::EllResult;

pub const OPTIONAL_MARKER: &str = "&optional:";
pub const KEY_MARKER: &str = "&key:";
pub const REST_MARKER: &str = "&rest:";
pub const ALL_KEYS_MARKER: &str = "&all-keys:";

/// Marker symbols and the group each one switches to. Interned once per
/// [`Normalizer`].
pub(super) fn parameter_markers() -> [(Symbol, Group); 4] {
    [
        (intern(OPTIONAL_MARKER), Group::Optional),
        (intern(KEY_MARKER), Group::Key),
        (intern(REST_MARKER), Group::Rest),
        (intern(ALL_KEYS_MARKER), Group::AllKeys),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Group {
    Required,
    Optional,
    Key,
    Rest,
    AllKeys,
}

impl Normalizer<'_> {
    fn marker_group(&self, stx: &Syntax) -> Option<Group> {
        match stx {
            Syntax::Symbol(sym) => self
                .markers
                .iter()
                .find(|(marker, _)| *marker == sym.symbol)
                .map(|(_, group)| *group),
            _ => None,
        }
    }

    /// `x key: v y` -> positional `[x, y]`, keywords `{key: v}`.
    ///
    /// A later occurrence of the same keyword replaces the earlier value.
    pub fn dissect_args(&self, elts: &[Syntax]) -> EllResult<Args> {
        let mut args = Args::default();
        let mut iter = elts.iter();

        while let Some(arg) = iter.next() {
            match arg {
                Syntax::Symbol(sym) if sym.symbol.is_keyword_marker() => {
                    let key = sym.symbol.sans_colon();
                    let value = iter.next().ok_or(Dissection::MissingKeywordValue(key))?;
                    let value = self.normalize(value)?;
                    args.key.insert(key, value);
                }
                _ => args.pos.push(self.normalize(arg)?),
            }
        }

        Ok(args)
    }

    /// Splits a lambda list into required, optional, keyword, rest and
    /// all-keys groups. Parameters before any marker are required.
    pub fn dissect_params(&self, elts: &[Syntax]) -> EllResult<Params> {
        let mut params = Params::default();
        let mut rest = Vec::new();
        let mut all_keys = Vec::new();
        let mut group = Group::Required;

        for elt in elts {
            if let Some(next) = self.marker_group(elt) {
                group = next;
                continue;
            }

            let param = self.dissect_param(elt)?;
            match group {
                Group::Required => params.req.push(param),
                Group::Optional => params.opt.push(param),
                Group::Key => params.key.push(param),
                Group::Rest => rest.push(param),
                Group::AllKeys => all_keys.push(param),
            }
        }

        if rest.len() > 1 {
            return Err(Dissection::MultipleRest.into());
        }
        if all_keys.len() > 1 {
            return Err(Dissection::MultipleAllKeys.into());
        }

        params.rest = rest.pop();
        params.all_keys = all_keys.pop();
        Ok(params)
    }

    /// `name` or `(name default)`.
    fn dissect_param(&self, stx: &Syntax) -> EllResult<Param> {
        match stx {
            Syntax::Symbol(sym) => Ok(Param {
                id: Identifier::variable(sym.symbol),
                init: None,
            }),
            Syntax::List(list) => {
                list.assert_len(2)?;
                let name = self.first(list)?.as_symbol()?;
                let init = self.normalize(&self.second(list)?)?;
                Ok(Param {
                    id: Identifier::variable(name),
                    init: Some(init),
                })
            }
            other => Err(EllError::identity("parameter", other.describe())),
        }
    }
}
