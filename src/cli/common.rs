//! Shared clap helper types for CLI commands.

use clap::ValueEnum;
use quizdump::{Attribute, FilterOp, SortOrder};

/// Comparisons accepted by `quizdump filter --op`.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum FilterOpArg {
    Find,
    Gt,
    Lt,
}

impl From<FilterOpArg> for FilterOp {
    fn from(value: FilterOpArg) -> FilterOp {
        match value {
            FilterOpArg::Find => FilterOp::Find,
            FilterOpArg::Gt => FilterOp::GreaterThan,
            FilterOpArg::Lt => FilterOp::LessThan,
        }
    }
}

/// Sort directions accepted by `quizdump sort --order`.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum SortOrderArg {
    #[value(name = "asc", alias = "lt")]
    Asc,
    #[value(name = "desc", alias = "gt")]
    Desc,
}

impl From<SortOrderArg> for SortOrder {
    fn from(value: SortOrderArg) -> SortOrder {
        match value {
            SortOrderArg::Asc => SortOrder::Ascending,
            SortOrderArg::Desc => SortOrder::Descending,
        }
    }
}

/// Column selector used by filter and sort.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum AttributeArg {
    Question,
    Answer,
}

impl From<AttributeArg> for Attribute {
    fn from(value: AttributeArg) -> Attribute {
        match value {
            AttributeArg::Question => Attribute::Question,
            AttributeArg::Answer => Attribute::Answer,
        }
    }
}
