use fleetq_query::action::{Action, ActionState};
use nu_ansi_term::Color::{Blue, Cyan, Green, Red, Yellow};
use serde::{Deserialize, Serialize};
use tabled::{
    builder::Builder,
    settings::{peaker::PriorityMax, themes::BorderCorrection, Panel, Style, Width},
};

use crate::{
    error::{CliResult, ErrorContext},
    utils::{print_json, read_input, term_width, Colored},
};

/// Accepted input shapes: a paged list response, a bare array, or one action.
#[derive(Deserialize)]
#[serde(untagged)]
enum ActionInput {
    Page { content: Vec<Action> },
    Many(Vec<Action>),
    One(Action),
}

impl ActionInput {
    fn into_actions(self) -> Vec<Action> {
        match self {
            Self::Page { content } => content,
            Self::Many(actions) => actions,
            Self::One(action) => vec![action],
        }
    }
}

pub fn parse_actions(json: &str) -> CliResult<Vec<Action>> {
    let input: ActionInput =
        serde_json::from_str(json).with_context(|| "parsing action records".to_string())?;
    Ok(input.into_actions())
}

#[derive(Serialize)]
struct ActionReport {
    id: Option<u64>,
    state: ActionState,
    errored: bool,
    canceled: bool,
    canceling: bool,
    active: bool,
    forced: bool,
}

impl From<&Action> for ActionReport {
    fn from(action: &Action) -> Self {
        Self {
            id: action.id,
            state: action.state(),
            errored: action.is_errored(),
            canceled: action.is_canceled(),
            canceling: action.is_canceling(),
            active: action.is_active(),
            forced: action.is_forced(),
        }
    }
}

fn colored_state(state: ActionState) -> String {
    let color = match state {
        ActionState::Errored => Red,
        ActionState::Canceled | ActionState::Canceling => Yellow,
        ActionState::Finished => Green,
        ActionState::Running | ActionState::Scheduled => Blue,
        ActionState::WaitingForConfirmation | ActionState::Unknown => Cyan,
    };
    Colored(color, state).to_string()
}

pub fn action_state(file: Option<&str>, json: bool) -> CliResult<()> {
    let actions = parse_actions(&read_input(file)?)?;

    if json {
        let reports = actions.iter().map(ActionReport::from).collect::<Vec<_>>();
        return print_json(&reports);
    }

    let mut builder = Builder::new();
    builder.push_record(["ID", "Status", "Detail", "Type", "Force", "State"].map(String::from));
    for action in &actions {
        builder.push_record([
            action.id.map(|id| id.to_string()).unwrap_or_else(|| "-".into()),
            action.status.to_string(),
            action.detail_status.to_string(),
            action.action_type.to_string(),
            action.force_type.to_string(),
            colored_state(action.state()),
        ]);
    }

    let table = builder
        .build()
        .with(Panel::header("Actions"))
        .with(Style::rounded())
        .with(BorderCorrection {})
        .with(Width::wrap(term_width()).priority(PriorityMax::default()))
        .to_string();
    println!("{table}");

    Ok(())
}
