//! The table of built-in names

use crate::operator::Operator;
use crate::unit::{self, ChoiceMode, Unit};
use flurry_core::behavior::{Behavior, Nop};
use flurry_core::{Easing, Gen, Model, ModifyOp, Property};
use flurry_syntax::ast::{EACH_ANGLE, RANDOM_ANGLE};
use std::collections::HashMap;

/// Property operators: name, property, operation
const MODIFIERS: [(&str, Property, ModifyOp); 8] = [
    ("speed", Property::Speed, ModifyOp::Set),
    ("speed+", Property::Speed, ModifyOp::Add),
    ("speed*", Property::Speed, ModifyOp::Mul),
    ("opacity", Property::Opacity, ModifyOp::Set),
    ("opacity+", Property::Opacity, ModifyOp::Add),
    ("opacity*", Property::Opacity, ModifyOp::Mul),
    ("hue", Property::Hue, ModifyOp::Set),
    ("hue+", Property::Hue, ModifyOp::Add),
];

/// Build the name table every compilation resolves symbols against
pub(crate) fn builtins() -> HashMap<&'static str, Unit> {
    let mut names = HashMap::new();

    for model in Model::ALL {
        names.insert(model.name(), Unit::Model(model));
    }
    for easing in Easing::ALL {
        names.insert(easing.name(), Unit::Easing(easing));
    }
    names.insert(
        "nop",
        Unit::Behavior(Gen::new(|_, _| Box::new(Nop::new()) as Box<dyn Behavior>)),
    );
    for (name, property, op) in MODIFIERS {
        names.insert(name, Unit::Operator(Operator::Modify { name, property, op }));
    }

    let operators = [
        Operator::Model,
        Operator::Close,
        Operator::Translate,
        Operator::Rotate,
        Operator::Loop,
        Operator::Repeat,
        Operator::Emit,
        Operator::Block,
        Operator::Choice(ChoiceMode::Each),
        Operator::Choice(ChoiceMode::Random),
        Operator::Range(ChoiceMode::Each),
        Operator::Range(ChoiceMode::Random),
    ];
    for op in operators {
        names.insert(op.name(), Unit::Operator(op));
    }

    names.insert(EACH_ANGLE, Unit::Number(unit::angle(ChoiceMode::Each)));
    names.insert(RANDOM_ANGLE, Unit::Number(unit::angle(ChoiceMode::Random)));
    names
}
