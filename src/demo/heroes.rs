//! Static page content for the demo routes.

const HEROES: [(u32, &str); 9] = [
    (12, "Dr. Nice"),
    (13, "Bombasto"),
    (14, "Celeritas"),
    (15, "Magneta"),
    (16, "RubberMan"),
    (17, "Dynama"),
    (18, "Dr. IQ"),
    (19, "Magma"),
    (20, "Tornado"),
];

fn hero(id: u32) -> Option<&'static str> {
    HEROES
        .iter()
        .find(|(hero_id, _)| *hero_id == id)
        .map(|(_, name)| *name)
}

/// Body lines of the page rendered for `url`.
pub fn page_lines(url: &str) -> Vec<String> {
    let path = url.split(|c: char| c == '?' || c == '#').next().unwrap_or_default();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        ["dashboard"] => {
            let mut lines = vec!["Top Heroes".to_string(), String::new()];
            lines.extend(HEROES[1..5].iter().map(|(id, name)| format!("  {}  (detail/{})", name, id)));
            lines
        }
        ["heroes"] => {
            let mut lines = vec!["My Heroes".to_string(), String::new()];
            for (id, name) in HEROES.iter() {
                lines.push(format!("  {:>3}  {}", id, name));
                lines.push(String::new());
            }
            lines
        }
        ["detail", id] => match id.parse().ok().and_then(hero) {
            Some(name) => vec![
                format!("{} Details", name.to_uppercase()),
                String::new(),
                format!("id: {}", id),
                format!("name: {}", name),
            ],
            None => vec![format!("No hero with id {}", id)],
        },
        _ => vec![format!("Nothing to show for {}", url)],
    }
}
