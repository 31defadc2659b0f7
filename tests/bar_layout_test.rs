// Test duration decomposition, bar capacity and layout positions

use notation_sequencer::models::duration::{notes_for_sixteenths, total_sixteenths, CANONICAL_DURATIONS};
use notation_sequencer::models::{Bar, BarEntry, Duration};
use notation_sequencer::NoteSequence;
use num_rational::Rational32;

/// Fewest canonical durations summing to `n`, by exhaustive search
fn min_pieces(n: u32) -> usize {
    let mut best = vec![usize::MAX; n as usize + 1];
    best[0] = 0;
    for total in 1..=n as usize {
        for duration in CANONICAL_DURATIONS {
            let size = duration.to_sixteenths() as usize;
            if size <= total && best[total - size] != usize::MAX {
                best[total] = best[total].min(best[total - size] + 1);
            }
        }
    }
    best[n as usize]
}

#[test]
fn test_notes_for_sixteenths_sum_and_minimal() {
    for n in 0..=32 {
        let pieces = notes_for_sixteenths(n);
        assert_eq!(total_sixteenths(&pieces), n, "sum for {}", n);
        assert_eq!(pieces.len(), min_pieces(n), "piece count for {}", n);
    }
}

#[test]
fn test_notes_for_sixteenths_longest_first() {
    assert_eq!(
        notes_for_sixteenths(7),
        vec![Duration::DOTTED_QUARTER, Duration::SIXTEENTH]
    );
    assert_eq!(
        notes_for_sixteenths(15),
        vec![Duration::DOTTED_HALF, Duration::DOTTED_EIGHTH]
    );
}

#[test]
fn test_dotted_positions_after_whole() {
    // a whole fills the bar; the dotted quarter opens the next one
    let sequence = NoteSequence::from_triples(&[("C4", "1n", true), ("D4", "4n.", true)]).unwrap();

    assert_eq!(sequence.bars().len(), 2);
    assert_eq!(sequence.bars()[0].positions_required(), 1);
    assert_eq!(sequence.bars()[1].positions_required(), 8);

    let mut bar = Bar::with_first(0, BarEntry::note(0, Duration::WHOLE));
    assert!(!bar.can_accommodate(&Duration::DOTTED_QUARTER));
    bar = Bar::with_first(0, BarEntry::note(0, Duration::HALF));
    bar.push(BarEntry::note(1, Duration::DOTTED_QUARTER));
    assert_eq!(bar.positions_required(), 8);
}

#[test]
fn test_layout_positions_are_exact() {
    let sequence = NoteSequence::from_triples(&[
        ("C4", "8n.", true),
        ("D4", "16n", true),
        ("E4", "4n", true),
        ("F4", "2n", true),
    ])
    .unwrap();
    let bar = &sequence.bars()[0];

    assert_eq!(bar.positions_required(), 16);
    let positions: Vec<Rational32> = bar.layouts_default().iter().map(|l| l.position).collect();
    assert_eq!(
        positions,
        vec![
            Rational32::from_integer(0),
            Rational32::from_integer(3),
            Rational32::from_integer(4),
            Rational32::from_integer(8),
        ]
    );
}

#[test]
fn test_bar_view_json_shape() {
    let sequence = NoteSequence::from_triples(&[("E4", "2n", true), ("F4", "2n", false)]).unwrap();

    let json = serde_json::to_value(sequence.bar_views()).unwrap();

    assert_eq!(json[0]["sixteenths"], 16);
    assert_eq!(json[0]["isFull"], true);
    assert_eq!(json[0]["notes"][1]["position"], 1.0);
    assert_eq!(json[0]["notes"][1]["note"]["duration"], "2n");
    assert_eq!(json[0]["notes"][1]["note"]["isTieStart"], false);
}

#[test]
fn test_duration_fractions() {
    assert_eq!(Duration::DOTTED_QUARTER.as_fraction(), Rational32::new(3, 8));
    assert_eq!(Duration::WHOLE.as_fraction(), Rational32::from_integer(1));
    assert_eq!(
        "8n.".parse::<Duration>().unwrap().as_fraction(),
        Rational32::new(3, 16)
    );
}
