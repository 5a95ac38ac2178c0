//! eqnative: decode MathType "Equation Native" streams into LaTeX.
//!
//! MTEF (MathType Equation Format) is the binary serialization MathType and
//! Equation Editor embed in OLE compound documents under the
//! `Equation Native` stream name. This crate decodes MTEF versions 3 and 5
//! into an expression tree and renders the tree as a LaTeX string.
//!
//! The pipeline is strictly forward: bytes → flat records → tree → string.
//! Decoding is best-effort by design: a malformed stream marks the equation
//! invalid and renders as an empty string, while slot underflow, unknown
//! template selectors and unknown embellishments degrade to placeholder or
//! empty output without failing.
//!
//! # Example
//!
//! ```
//! use eqnative::{CharTable, Equation};
//!
//! // MTEF 5 header, then LINE { CHAR 'x' }.
//! let mut data = vec![5u8, 1, 0, 5, 2];
//! data.extend(b"Equation Editor\0");
//! data.push(1); // inline
//! data.extend([1, 0]); // LINE
//! data.extend([2, 0, 131, 0x78, 0x00]); // CHAR 'x', variable style
//! data.extend([0]); // END
//!
//! let equation = Equation::parse_mtef(&data);
//! assert!(equation.is_valid());
//! let latex = equation.to_latex(&CharTable::new());
//! assert!(latex.contains('x'));
//! ```
//!
//! Streams extracted straight from an OLE storage still carry the 28-byte
//! EQNOLEFILEHDR; hand those to [`Equation::from_equation_native`] instead.
//!
//! Character translation is an injected collaborator: [`CharTable`] layers
//! caller-supplied mappings over the built-in MTCode tables, so unusual
//! producers can be handled without forking the crate.

pub mod binary;
pub mod charset;
pub mod constants;
pub mod error;
pub mod headers;

mod latex;
mod parser;
mod records;
mod tree;

pub use charset::CharTable;
pub use error::{Error, Result};

use headers::EqnOleFileHeader;
use tree::Ast;

/// A decoded equation: header fields, the expression tree, and the sticky
/// validity state left behind by the decoder.
#[derive(Debug)]
pub struct Equation {
    mtef_version: u8,
    platform: u8,
    product: u8,
    version: u8,
    version_sub: u8,
    application: String,
    inline: u8,
    ast: Ast,
    error: Option<Error>,
}

impl Equation {
    /// Decode a full "Equation Native" stream: the 28-byte EQNOLEFILEHDR
    /// followed by the MTEF body.
    ///
    /// Only the outer header is validated here; body-level damage is
    /// recorded on the returned equation rather than reported as `Err`.
    pub fn from_equation_native(data: &[u8]) -> Result<Equation> {
        let header = EqnOleFileHeader::parse(data)?;
        let body = &data[header.body_range(data.len())];
        Ok(Self::parse_mtef(body))
    }

    /// Decode an MTEF body positioned at the version header.
    ///
    /// Never fails: decoder errors set the sticky invalid flag, the records
    /// decoded before the failure are kept, and [`Equation::to_latex`] on an
    /// invalid equation yields the empty string.
    pub fn parse_mtef(body: &[u8]) -> Equation {
        let parsed = parser::MtefParser::new(body).run();
        Equation {
            mtef_version: parsed.mtef_version,
            platform: parsed.platform,
            product: parsed.product,
            version: parsed.version,
            version_sub: parsed.version_sub,
            application: parsed.application,
            inline: parsed.inline,
            ast: Ast::build(parsed.nodes),
            error: parsed.error,
        }
    }

    /// Whether the whole stream decoded cleanly.
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// The decoder error that invalidated this equation, if any.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    pub fn mtef_version(&self) -> u8 {
        self.mtef_version
    }

    pub fn platform(&self) -> u8 {
        self.platform
    }

    pub fn product(&self) -> u8 {
        self.product
    }

    pub fn generator_version(&self) -> (u8, u8) {
        (self.version, self.version_sub)
    }

    /// Application key from the v5 header; empty for v3 streams.
    pub fn application(&self) -> &str {
        &self.application
    }

    /// Inline flag from the v5 header.
    pub fn inline(&self) -> u8 {
        self.inline
    }

    /// Render the equation as LaTeX.
    ///
    /// v3 output is wrapped in `$ … $`; v5 output is returned bare, so the
    /// caller chooses inline or display wrapping. An invalid equation
    /// renders as the empty string.
    pub fn to_latex(&self, chars: &CharTable) -> String {
        if self.error.is_some() {
            return String::new();
        }
        latex::translate(&self.ast, self.mtef_version, chars)
    }
}
