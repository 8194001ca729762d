use crate::domain::model::Card;
use crate::utils::error::Result;
use std::io::Read;
use std::path::Path;

/// Reads `(front, back)` rows. Rows with fewer than two columns are skipped,
/// extra columns are ignored.
pub fn read_cards<R: Read>(reader: R, has_header: bool) -> Result<Vec<Card>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(has_header)
        .flexible(true)
        .from_reader(reader);

    let mut cards = Vec::new();
    for (line, record) in csv_reader.records().enumerate() {
        let record = record?;
        match (record.get(0), record.get(1)) {
            (Some(front), Some(back)) => cards.push(Card::new(front, back)),
            _ => tracing::debug!("Skipping row {}: expected front and back columns", line + 1),
        }
    }

    Ok(cards)
}

pub fn read_cards_from_file<P: AsRef<Path>>(path: P, has_header: bool) -> Result<Vec<Card>> {
    let file = std::fs::File::open(path.as_ref())?;
    let cards = read_cards(file, has_header)?;
    tracing::info!(
        "📁 Loaded {} cards from {}",
        cards.len(),
        path.as_ref().display()
    );
    Ok(cards)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_cards_skips_short_rows() {
        let data = "Word 1,Definition 1\nlonely\nWord 2,Definition 2,extra\n";
        let cards = read_cards(data.as_bytes(), false).unwrap();

        assert_eq!(
            cards,
            vec![
                Card::new("Word 1", "Definition 1"),
                Card::new("Word 2", "Definition 2"),
            ]
        );
    }

    #[test]
    fn test_read_cards_with_header_and_quotes() {
        let data = "front,back\n\"Hello, world\",\"multi\nline\"\n";
        let cards = read_cards(data.as_bytes(), true).unwrap();

        assert_eq!(cards, vec![Card::new("Hello, world", "multi\nline")]);
    }
}
