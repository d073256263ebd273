use anyhow::{Context, Result, bail};
use demineur_core::{Coord, Coord2};

/// One line of player input.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    Solution,
    Quit,
}

impl Command {
    /// Accepts `R C`, `f R C`, `s` and `q`, separated by whitespace or commas.
    pub(crate) fn parse(line: &str) -> Result<Self> {
        let words: Vec<&str> = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|word| !word.is_empty())
            .collect();

        match words.as_slice() {
            ["q" | "quit"] => Ok(Self::Quit),
            ["s" | "solution"] => Ok(Self::Solution),
            ["f" | "flag", row, col] => Ok(Self::Flag(parse_coords(row, col)?)),
            [row, col] => Ok(Self::Reveal(parse_coords(row, col)?)),
            [] => bail!("empty command"),
            _ => bail!("unknown command {line:?}"),
        }
    }
}

fn parse_coords(row: &str, col: &str) -> Result<Coord2> {
    let row: Coord = row.parse().with_context(|| format!("invalid row {row:?}"))?;
    let col: Coord = col
        .parse()
        .with_context(|| format!("invalid column {col:?}"))?;
    Ok((row, col))
}
