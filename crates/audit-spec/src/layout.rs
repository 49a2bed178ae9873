use std::collections::BTreeSet;

use serde::Serialize;

use crate::answers::normalize;
use crate::merge::WorkingQuestion;
use crate::spec::{Question, QuestionKind};
use crate::visibility::HiddenSet;

/// Groups whose second instance the user expanded. Session state only.
pub type ShownDuplicates = BTreeSet<String>;

/// Input widget a host should draw for a visible question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputControl {
    Choice {
        options: Vec<String>,
        selected: Option<String>,
        /// Present for kinds that take supplementary free text.
        detail: Option<String>,
    },
    Gradient {
        options: Vec<String>,
        selected: Option<String>,
        height: String,
        length: String,
    },
    Images {
        images: Vec<String>,
    },
    Text {
        value: String,
        numeric: bool,
    },
}

impl InputControl {
    fn offers(&self, value: &str) -> bool {
        match self {
            InputControl::Choice { options, .. } | InputControl::Gradient { options, .. } => {
                options.iter().any(|option| option == value)
            }
            InputControl::Images { .. } | InputControl::Text { .. } => false,
        }
    }
}

/// One entry of the ordered display list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayItem {
    Heading {
        id: String,
        title: String,
    },
    Question {
        id: String,
        label: String,
        question_type: QuestionKind,
        input: InputControl,
    },
    DuplicateToggle {
        group: String,
        expanded: bool,
        label: String,
    },
}

impl DisplayItem {
    /// Question id for headings and questions; toggles have none.
    pub fn id(&self) -> Option<&str> {
        match self {
            DisplayItem::Heading { id, .. } | DisplayItem::Question { id, .. } => Some(id),
            DisplayItem::DuplicateToggle { .. } => None,
        }
    }
}

/// Input that had focus before a redraw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusHint {
    pub id: String,
    /// Selected radio value, when the focused input was a choice.
    pub value: Option<String>,
}

/// Produces the ordered display list for the current answers.
pub fn compute_visible_list(
    questions: &[WorkingQuestion],
    hidden: &HiddenSet,
    shown: &ShownDuplicates,
) -> Vec<DisplayItem> {
    let mut items = Vec::new();
    let mut toggle_groups: Vec<&str> = Vec::new();

    for working in questions {
        let question = &working.question;
        if hidden.contains(&question.id) {
            continue;
        }
        if question.is_second_instance() && !is_expanded(question, shown) {
            continue;
        }

        items.push(display_item(working));

        if question.duplicate_group
            && question.is_first_instance()
            && let Some(group) = question.group.as_deref()
            && !toggle_groups.contains(&group)
        {
            toggle_groups.push(group);
        }
    }

    let mut toggles = toggle_groups
        .into_iter()
        .filter_map(|group| duplicate_toggle(questions, hidden, shown, group, &items))
        .collect::<Vec<_>>();
    toggles.sort_by(|left, right| right.0.cmp(&left.0));
    for (position, toggle) in toggles {
        items.insert(position + 1, toggle);
    }

    items
}

/// Finds the redrawn input that should regain focus.
pub fn locate_focus(items: &[DisplayItem], hint: &FocusHint) -> Option<usize> {
    items.iter().position(|item| match item {
        DisplayItem::Question { id, input, .. } if *id == hint.id => match &hint.value {
            Some(value) => input.offers(value),
            None => true,
        },
        DisplayItem::Heading { id, .. } => *id == hint.id && hint.value.is_none(),
        _ => false,
    })
}

pub fn toggle_label(group: &str, expanded: bool) -> String {
    if expanded {
        format!("Hide second {group}")
    } else {
        format!("Add another {group}")
    }
}

fn duplicate_toggle(
    questions: &[WorkingQuestion],
    hidden: &HiddenSet,
    shown: &ShownDuplicates,
    group: &str,
    items: &[DisplayItem],
) -> Option<(usize, DisplayItem)> {
    let members = questions
        .iter()
        .filter(|working| {
            working.question.group.as_deref() == Some(group)
                && working.question.is_first_instance()
                && !hidden.contains(working.id())
        })
        .collect::<Vec<_>>();
    let last = members.last()?;

    let controlling = members
        .iter()
        .find(|working| working.question.kind.is_yes_no_family());
    if controlling.is_some_and(|working| working.answer.normalized_response() == "no") {
        return None;
    }

    let position = items
        .iter()
        .position(|item| item.id() == Some(last.id()))?;
    let expanded = shown.contains(group);
    Some((
        position,
        DisplayItem::DuplicateToggle {
            group: group.to_string(),
            expanded,
            label: toggle_label(group, expanded),
        },
    ))
}

fn display_item(working: &WorkingQuestion) -> DisplayItem {
    let question = &working.question;
    if question.is_heading {
        return DisplayItem::Heading {
            id: question.id.clone(),
            title: question.question.clone(),
        };
    }

    DisplayItem::Question {
        id: question.id.clone(),
        label: question.question.clone(),
        question_type: question.kind,
        input: input_control(working),
    }
}

fn input_control(working: &WorkingQuestion) -> InputControl {
    let question = &working.question;
    let answer = &working.answer;
    match question.kind {
        QuestionKind::YesNo
        | QuestionKind::YesNoPartial
        | QuestionKind::YesNoDetail
        | QuestionKind::Option => {
            let options = question.choices();
            InputControl::Choice {
                selected: selected_choice(&options, &answer.response),
                detail: (question.kind == QuestionKind::YesNoDetail)
                    .then(|| answer.response_detail.clone()),
                options,
            }
        }
        QuestionKind::Gradient => {
            let options = question.choices();
            InputControl::Gradient {
                selected: selected_choice(&options, &answer.response),
                options,
                height: answer.height.clone(),
                length: answer.length.clone(),
            }
        }
        QuestionKind::Image => InputControl::Images {
            images: answer.image_list.clone(),
        },
        QuestionKind::Text | QuestionKind::Number | QuestionKind::Measure => InputControl::Text {
            value: answer.response.clone(),
            numeric: question.kind == QuestionKind::Number,
        },
    }
}

fn selected_choice(options: &[String], response: &str) -> Option<String> {
    options
        .iter()
        .find(|option| normalize(option) == normalize(response))
        .cloned()
}

fn is_expanded(question: &Question, shown: &ShownDuplicates) -> bool {
    question
        .group
        .as_deref()
        .is_some_and(|group| shown.contains(group))
}
