//! Generated pest parser for the XML subset.

use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "xml.pest"]
pub(crate) struct XmlGrammar;
