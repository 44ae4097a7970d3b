//! Setup-phase input: player count, then a name and a vote per player

use std::io::{self, BufRead, Write};

use dg_core::{Player, PlayerRoster, RoleCatalog, Vote};

/// Read one trimmed line; `None` at end of input
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, text: &str) -> io::Result<String> {
    write!(out, "{text}")?;
    out.flush()?;
    read_line(input)?
        .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "input ended during setup"))
}

/// Prompt for every player and their vote
///
/// The player count must be a number. Votes are never rejected: anything
/// that is not a catalog index becomes a random vote.
pub fn read_ballots<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    catalog: &RoleCatalog,
) -> io::Result<Vec<(Player, Vote)>> {
    let count = prompt(input, out, "Number of players: ")?;
    let count: usize = count.parse().map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("player count must be a number, got '{count}'"),
        )
    })?;

    let mut roster = PlayerRoster::default();
    let mut ballots = Vec::with_capacity(count);
    for i in 1..=count {
        let name = prompt(input, out, &format!("{i}th player name: "))?;
        let vote = prompt(input, out, &format!("{name}'s vote: "))?;
        ballots.push((roster.join(name), Vote::parse(&vote, catalog)));
    }
    Ok(ballots)
}
