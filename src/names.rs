//! Symbol name normalization
//!
//! Header matching works on human-meaningful names, so raw linker names are
//! demangled and trimmed down to their innermost unqualified stem. The raw
//! name stays the identity of a symbol; the stem is only used for exemption.

pub mod demangle;
pub mod normalize;

pub use demangle::{CxxFiltDemangler, Demangler, DemanglerKind, LinkedDemangler, NoDemangler};
pub use normalize::{
    canonical_stem, innermost_component, strip_parameters, strip_return_type, strip_symbol_version,
    strip_template_args, NameNormalizer, Normalized,
};
