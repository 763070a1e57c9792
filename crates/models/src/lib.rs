mod annotations;
mod conditions;
mod evaluators;
mod notifications;
mod reducers;
mod rules;
mod targets;
mod variables;

pub use annotations::Annotation;
pub use conditions::{Condition, ConditionQuery, Operator, OperatorKind, QueryCondition};
pub use evaluators::{Evaluator, EvaluatorKind};
pub use notifications::{ChannelRef, NotificationChannel};
pub use reducers::{Reducer, ReducerKind};
pub use rules::{AlertRule, DurationError, ExecutionErrorState, NoDataState, RuleDefaults};
pub use targets::Target;
pub use variables::Variable;
