//! Interactive command-line front end.

use std::io::{BufRead, Write};

use crate::api::{ItineraryAPI, API};
use crate::entities::Itinerary;
use crate::error::{invalid_input_error, Error, ErrorKind};

/// Asks for an address and a stop count, then prints the planned itinerary.
///
/// Planning failures are reported to `output` and yield `Ok(None)`; only
/// terminal I/O failures and unreadable answers are returned as errors.
pub async fn run<A, R, W>(api: &A, input: &mut R, output: &mut W) -> Result<Option<Itinerary>, Error>
where
    A: API + Sync + ?Sized,
    R: BufRead,
    W: Write,
{
    writeln!(output, "--- 🍻 Bar Hopper ---")?;

    let address = ask(input, output, "Enter a starting address: ")?;
    if address.is_empty() {
        writeln!(output, "An address is required.")?;
        return Err(invalid_input_error());
    }

    let stops = ask_stop_count(input, output)?;

    writeln!(output, "\nPlanning a walking route from '{}'...", address)?;

    match api.create_itinerary(address, Some(stops)).await {
        Ok(itinerary) => {
            write!(output, "{}", render(&itinerary))?;
            Ok(Some(itinerary))
        }
        Err(err) => {
            tracing::warn!("planning failed: {}", err);
            writeln!(output, "{}", describe(&err))?;
            Ok(None)
        }
    }
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<String, Error> {
    write!(output, "{}", question)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(invalid_input_error());
    }

    Ok(line.trim().to_string())
}

/// One retry after a non-numeric answer.
fn ask_stop_count<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<i64, Error> {
    let question = "How many bars do you want to visit? ";

    if let Ok(stops) = ask(input, output, question)?.parse() {
        return Ok(stops);
    }

    writeln!(output, "Enter a number!")?;

    ask(input, output, question)?
        .parse()
        .map_err(|_| invalid_input_error())
}

pub fn render(itinerary: &Itinerary) -> String {
    let mut out = String::from("\n✅ YOUR ROUTE:\n");

    for (i, stop) in itinerary.route.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} ({} ⭐)\n   Move: {:.2} miles from previous stop\n",
            i + 1,
            stop.place.name,
            stop.place.rating_label(),
            stop.dist_from_last
        ));
    }

    out.push_str(&"-".repeat(30));
    out.push('\n');
    out.push_str(&format!(
        "Total Walking Distance: {:.2} miles\n",
        itinerary.total_distance
    ));
    out.push_str(&format!("\nOpen your route in Maps: {}\n", itinerary.map_url));

    out
}

pub fn describe(err: &Error) -> String {
    match err.kind() {
        ErrorKind::Resolution => format!("Could not find that address ({}).", err.message),
        ErrorKind::NoCandidatesFound => "No bars found in that area!".into(),
        ErrorKind::InvalidInput => "That input was not valid.".into(),
        ErrorKind::Transport | ErrorKind::Upstream => {
            "The maps service is unavailable right now, try again later.".into()
        }
        ErrorKind::Config | ErrorKind::Unexpected => format!("An error occurred: {}", err),
    }
}

#[cfg(test)]
async fn run_with(api: &crate::engine::Engine, answers: &str) -> (Result<Option<Itinerary>, Error>, String) {
    let mut input = std::io::Cursor::new(answers.as_bytes().to_vec());
    let mut output = Vec::new();

    let result = run(api, &mut input, &mut output).await;

    (result, String::from_utf8(output).unwrap())
}

#[tokio::test]
async fn prints_numbered_route_with_total() {
    use crate::entities::Coordinates;
    use crate::test_support::{engine, equator_bars, StubFinder, StubResolver};

    let api = engine(
        StubResolver::at(Coordinates::new(0.0, 0.0)),
        StubFinder::with_places(equator_bars()),
    );

    let (result, transcript) = run_with(&api, "Null Island\n2\n").await;
    let itinerary = result.unwrap().unwrap();

    assert_eq!(itinerary.route.len(), 2);
    assert!(transcript.contains("1. A (4.2 ⭐)\n   Move: 69.09 miles from previous stop\n"));
    assert!(transcript.contains("2. C (3.9 ⭐)\n   Move: 69.09 miles from previous stop\n"));
    assert!(transcript.contains("Total Walking Distance: 138.19 miles"));
    assert!(transcript.contains("Open your route in Maps: https://www.google.com/maps/dir/0,0/1,0/2,0"));
}

#[tokio::test]
async fn retries_stop_count_once() {
    use crate::entities::Coordinates;
    use crate::test_support::{engine, equator_bars, StubFinder, StubResolver};

    let api = engine(
        StubResolver::at(Coordinates::new(0.0, 0.0)),
        StubFinder::with_places(equator_bars()),
    );

    let (result, transcript) = run_with(&api, "Null Island\nthree\n3\n").await;
    assert!(transcript.contains("Enter a number!"));
    assert_eq!(result.unwrap().unwrap().route.len(), 3);

    let (result, _) = run_with(&api, "Null Island\nthree\nfour\n").await;
    assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn reports_empty_area() {
    use crate::entities::Coordinates;
    use crate::test_support::{engine, StubFinder, StubResolver};

    let api = engine(
        StubResolver::at(Coordinates::new(0.0, 0.0)),
        StubFinder::with_places(vec![]),
    );

    let (result, transcript) = run_with(&api, "Sahara\n3\n").await;
    assert!(result.unwrap().is_none());
    assert!(transcript.contains("No bars found in that area!"));
}

#[test]
fn unrated_stop_renders_na() {
    use crate::entities::{Coordinates, Place, Route, Stop};

    let route = Route::new(vec![Stop::new(
        Place::new("Dive", Coordinates::new(0.0, 0.01), None),
        0.6909,
    )]);
    let itinerary = Itinerary::new("here".into(), Coordinates::new(0.0, 0.0), route, "https://m");

    let text = render(&itinerary);
    assert!(text.contains("1. Dive (N/A ⭐)"));
    assert!(text.contains("Move: 0.69 miles"));
    assert!(text.contains("Total Walking Distance: 0.69 miles"));
}

#[test]
fn failures_read_differently() {
    use crate::error::{no_candidates_error, resolution_error, upstream_error};

    assert_ne!(describe(&resolution_error("ZERO_RESULTS")), describe(&no_candidates_error()));
    assert_ne!(describe(&no_candidates_error()), describe(&upstream_error()));
    assert!(describe(&resolution_error("ZERO_RESULTS")).contains("ZERO_RESULTS"));
}
