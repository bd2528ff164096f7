//! Best-effort extraction of a flight identifier from the disruption
//! prompt, used to derive operational-store keys. The accessor treats
//! absent keys as empty reads, so a miss here costs nothing but context.

/// Finds the first token that looks like a flight number: 2-3 leading
/// letters followed by 2-4 digits (e.g. `EY123`).
pub fn flight_token(prompt: &str) -> Option<&str> {
    prompt.split_whitespace().find(|token| {
        let letters = token.chars().take_while(|c| c.is_ascii_alphabetic()).count();
        let digits = token.chars().skip(letters).take_while(|c| c.is_ascii_digit()).count();
        (2..=3).contains(&letters) && (2..=4).contains(&digits) && letters + digits == token.len()
    })
}

pub fn keyed(flight: Option<&str>, suffixes: &[&str]) -> Vec<String> {
    let flight = flight.unwrap_or("UNKNOWN");
    suffixes.iter().map(|suffix| format!("{flight}:{suffix}")).collect()
}
