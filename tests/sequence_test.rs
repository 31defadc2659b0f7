// Test bar partitioning, selection and navigation through the public sequence API

use notation_sequencer::models::{BarSlot, Duration, NoteRecord, Timed};
use notation_sequencer::NoteSequence;

/// Helper to build a sequence of `count` quarter notes
fn quarters(count: usize) -> NoteSequence {
    let names: Vec<&str> = ["C4", "D4", "E4", "F4", "G4", "A4", "B4", "C5", "D5"]
        .iter()
        .cycle()
        .take(count)
        .copied()
        .collect();
    NoteSequence::from_names(&names).unwrap()
}

/// Helper to list each bar's entry durations
fn bar_durations(sequence: &NoteSequence) -> Vec<Vec<String>> {
    sequence
        .bars()
        .iter()
        .map(|bar| bar.entries().iter().map(|e| e.duration.to_string()).collect())
        .collect()
}

#[test]
fn test_four_quarters_fill_one_bar() {
    let sequence = quarters(4);

    assert_eq!(sequence.bars().len(), 1);
    let bar = &sequence.bars()[0];
    assert_eq!(bar.len(), 4);
    assert_eq!(bar.start_index, 0);
    assert!(bar.is_full());
}

#[test]
fn test_nine_quarters_make_three_bars() {
    let sequence = quarters(9);

    let starts: Vec<usize> = sequence.bars().iter().map(|b| b.start_index).collect();
    assert_eq!(starts, vec![0, 4, 8]);
    assert_eq!(sequence.bars()[2].len(), 1);
    assert!(!sequence.bars()[2].is_full());
}

#[test]
fn test_half_after_three_quarters_is_tied() {
    let sequence =
        NoteSequence::from_triples(&[("E4", "4n", true), ("F4", "4n", true), ("G4", "4n", true), ("A4", "2n", true)])
            .unwrap();

    assert_eq!(bar_durations(&sequence), vec![vec!["4n", "4n", "4n", "4n"], vec!["4n"]]);
    assert!(sequence.note(3).unwrap().is_represented_as_tie());

    let start = match sequence.bars()[0].entries()[3].slot {
        BarSlot::Tie(id) => id,
        BarSlot::Note(_) => panic!("expected a tie fragment"),
    };
    let end = match sequence.bars()[1].entries()[0].slot {
        BarSlot::Tie(id) => id,
        BarSlot::Note(_) => panic!("expected a tie fragment"),
    };
    assert_eq!(sequence.fragment(end).unwrap().start_tie, Some(start));
    assert_eq!(sequence.fragment(start).unwrap().name(), "A4");
}

#[test]
fn test_dotted_overflow_splits_into_canonical_pieces() {
    // 14 sixteenths used, a dotted half (12) leaves 2 + 10
    let sequence = NoteSequence::from_triples(&[
        ("E4", "2n.", true),
        ("F4", "8n", true),
        ("G4", "2n.", true),
    ])
    .unwrap();

    assert_eq!(
        bar_durations(&sequence),
        vec![vec!["2n.", "8n", "8n"], vec!["2n", "8n"]]
    );
}

#[test]
fn test_every_bar_within_capacity() {
    let triples: Vec<(&str, &str, bool)> = ["4n.", "2n", "16n", "1n", "8n.", "2n.", "4n", "8n", "16n", "1n"]
        .iter()
        .map(|&d| ("C4", d, true))
        .collect();
    let sequence = NoteSequence::from_triples(&triples).unwrap();

    let total: u32 = sequence.notes().iter().map(|n| n.sixteenths()).sum();
    let bar_total: u32 = sequence.bars().iter().map(|b| b.sixteenths()).sum();
    assert_eq!(total, bar_total);

    for bar in sequence.bars() {
        let sum: u32 = bar.entries().iter().map(Timed::sixteenths).sum();
        assert!(sum <= 16);
        assert_eq!(bar.is_full(), sum == 16);
    }
}

#[test]
fn test_next_bar_wraps_from_last_note() {
    let mut sequence = quarters(9);
    sequence.select_last();

    sequence.select_next_bar();

    assert_eq!(sequence.selected_index(), Some(0));
    assert_eq!(sequence.selected_note().unwrap().name(), "C4");
}

#[test]
fn test_prev_bar_wraps_from_first_note() {
    let mut sequence = quarters(9);
    sequence.select_first();

    sequence.select_prev_bar();

    assert_eq!(sequence.selected_index(), Some(8));
}

#[test]
fn test_single_selection_across_navigation() {
    let mut sequence = quarters(6);
    sequence.select(2).unwrap();
    sequence.select_next();
    sequence.select_next_bar();
    sequence.click(1).unwrap();

    let selected: Vec<usize> = sequence
        .notes()
        .iter()
        .enumerate()
        .filter(|(_, n)| n.is_selected)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(selected, vec![1]);
    assert_eq!(sequence.selected_index(), Some(1));
}

#[test]
fn test_records_round_trip() {
    let records = vec![
        NoteRecord::new("E4", "4n", true),
        NoteRecord::new("R", "8n.", false),
        NoteRecord::new("G5", "1n", true),
        NoteRecord::new("D2", "16n", false),
    ];

    let sequence = NoteSequence::from_records(&records).unwrap();

    assert_eq!(sequence.to_records(), records);
}

#[test]
fn test_empty_sequence() {
    let mut sequence = NoteSequence::from_records(&[]).unwrap();

    assert!(sequence.bars().is_empty());
    sequence.select_first();
    sequence.select_next_bar();
    assert_eq!(sequence.selected_index(), None);
}

#[test]
fn test_add_to_empty_sequence() {
    let mut sequence = NoteSequence::new();
    sequence
        .add(notation_sequencer::Note::new("E4", Duration::WHOLE).unwrap())
        .unwrap();

    assert_eq!(sequence.bars().len(), 1);
    assert!(sequence.bars()[0].is_full());
}
