use anyhow::{Context, Result};
use nextbus_core::{HeadlessMap, Position, SessionHistory, StopClient};
use tracing::{info, warn};

/// A user action replayed against the client.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    /// Drop the self marker at a position
    Drag(Position),
    Back,
    Forward,
    /// Click the n-th known stop, in the order they are listed
    Click(usize),
    /// Click the map outside any marker
    Close,
}

pub fn parse_step(s: &str) -> Result<Step, String> {
    let (verb, argument) = match s.split_once(':') {
        Some((verb, argument)) => (verb, Some(argument)),
        None => (s, None),
    };

    match (verb, argument) {
        ("drag", Some(position)) => position
            .parse()
            .map(Step::Drag)
            .map_err(|e| format!("bad drag target: {}", e)),
        ("back", None) => Ok(Step::Back),
        ("forward", None) => Ok(Step::Forward),
        ("click", Some(index)) => index
            .parse()
            .map(Step::Click)
            .map_err(|_| format!("bad stop index {:?}", index)),
        ("close", None) => Ok(Step::Close),
        _ => Err(format!(
            "unknown step {:?}; expected drag:LAT,LNG, back, forward, click:N or close",
            s
        )),
    }
}

pub async fn perform(
    step: &Step,
    client: &StopClient,
    map: &HeadlessMap,
    history: &SessionHistory,
) -> Result<()> {
    info!(?step, "Performing step");

    let discovery = match step {
        Step::Drag(position) => {
            map.drag_self_marker(*position);
            Some(client.on_drag(*position))
        }
        Step::Back => client.on_history_navigate(history.back()),
        Step::Forward => client.on_history_navigate(history.forward()),
        Step::Click(index) => {
            let stops = client.stops();
            let stop = stops
                .get(*index)
                .with_context(|| format!("No stop #{} ({} known)", index, stops.len()))?;

            if let Some(lookup) = client.on_stop_clicked(stop.key()) {
                match lookup.await? {
                    Ok(count) => info!(stop = %stop.name(), count, "Departures shown"),
                    Err(error) => warn!(%error, "Departures unavailable"),
                }
            }
            None
        }
        Step::Close => {
            client.on_map_clicked();
            None
        }
    };

    match discovery {
        Some(handle) => match handle.await? {
            Ok(added) => info!(added, "Discovery finished"),
            Err(error) => warn!(%error, "Discovery failed"),
        },
        None if matches!(step, Step::Back | Step::Forward) => {
            info!("Nothing to navigate to");
        }
        None => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use nextbus_core::{ClientConfig, Collaborators};
    use nextbus_transit::StaticStopDirectory;

    use super::*;

    #[test]
    fn test_parse_steps() {
        assert_eq!(
            parse_step("drag:56.17,10.21"),
            Ok(Step::Drag(Position::new(56.17, 10.21)))
        );
        assert_eq!(parse_step("back"), Ok(Step::Back));
        assert_eq!(parse_step("forward"), Ok(Step::Forward));
        assert_eq!(parse_step("click:3"), Ok(Step::Click(3)));
        assert_eq!(parse_step("close"), Ok(Step::Close));
    }

    #[test]
    fn test_parse_step_errors() {
        assert!(parse_step("drag").is_err());
        assert!(parse_step("drag:north").is_err());
        assert!(parse_step("click:-1").is_err());
        assert!(parse_step("back:2").is_err());
        assert!(parse_step("jump").is_err());
    }

    #[tokio::test]
    async fn test_drag_step_moves_marker_and_client() {
        let map = Arc::new(HeadlessMap::new());
        let history = Arc::new(SessionHistory::new());
        let directory = Arc::new(StaticStopDirectory::new());
        let collaborators = Collaborators {
            map: map.clone(),
            history: history.clone(),
            stops: directory.clone(),
            departures: directory,
        };
        let start = Position::new(56.153014, 10.203261);
        let (client, discovery) = StopClient::start(ClientConfig::default(), collaborators, start);
        discovery.await.unwrap().unwrap();

        let target = Position::new(56.17, 10.21);
        perform(&Step::Drag(target), &client, &map, &history).await.unwrap();

        assert_eq!(map.self_marker(), Some(target));
        assert_eq!(client.position(), target);
        assert_eq!(history.len(), 2);
    }
}
