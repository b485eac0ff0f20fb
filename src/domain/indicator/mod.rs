//! Indicator domain - Annotation records and their resolution against mutations

mod entity;
mod resolver;

pub use entity::{
    Abstract, Citations, Drug, IndicatorQuery, IndicatorRecord, IndicatorTable, MutationEffect,
    Treatment,
};
pub use resolver::{
    default_indicator_filter, default_mutation_filter, group_indicators_by_position,
    indicator_for_mutation,
};
