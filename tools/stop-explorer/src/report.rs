use nextbus_core::{
    Anchor, HeadlessMap, Messages, Popup, PopupContent, SessionHistory, StopClient, TooltipState,
};

/// Print what the map shows after all steps.
pub fn print_state(client: &StopClient, map: &HeadlessMap, history: &SessionHistory, messages: &Messages) {
    println!("Position: {}", client.position());
    if let Some((center, radius_m)) = map.search_radius() {
        println!("Search radius: {} m around {}", radius_m, center);
    }
    if let Some(entry) = history.current() {
        println!("URL: {} ({} history entries)", entry.url, history.len());
    }

    let stops = client.stops();
    println!();
    println!("Stops ({}):", stops.len());
    for (index, stop) in stops.iter().enumerate() {
        println!("  [{}] {} {} at {}", index, stop.id(), stop.name(), stop.position());
    }

    println!();
    match client.tooltip().state() {
        TooltipState::Closed => println!("Tooltip: closed"),
        TooltipState::Hint => println!("Tooltip: {}", PopupContent::Hint.to_text(messages)),
        TooltipState::Error => println!(
            "Tooltip: {} (shown {} times)",
            PopupContent::Unavailable.to_text(messages),
            client.tooltip().error_count()
        ),
    }

    if let Some((anchor, content)) = map.popup(Popup::Departures) {
        let title = match anchor {
            Anchor::Stop(key) => client
                .stop(&key)
                .map(|stop| stop.name().to_string())
                .unwrap_or_else(|| key.to_string()),
            Anchor::SelfMarker => "self".to_string(),
        };
        println!();
        println!("Departures at {}:", title);
        for line in content.to_text(messages).lines() {
            println!("  {}", line);
        }
    }
}
