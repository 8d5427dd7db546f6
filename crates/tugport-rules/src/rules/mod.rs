//! Built-in rules.

pub mod annotation_to_attribute;
pub mod match_to_switch;
pub mod route_name_constants;
pub mod underscored_methods;

pub use annotation_to_attribute::AnnotationToAttribute;
pub use match_to_switch::DowngradeMatchToSwitch;
pub use route_name_constants::ExtractRouteNameConstants;
pub use underscored_methods::CollectUnderscoredMethods;
