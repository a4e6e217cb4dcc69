use super::*;

fn sentence_text(sentences: usize) -> String {
    (0..sentences)
        .map(|i| format!("Sentence number {} talks about routine maintenance. ", i))
        .collect()
}

#[test]
fn short_text_is_single_chunk() {
    let config = SplitterConfig::default();
    let text = "A short note about disk usage.";

    let chunks = split_text(text, &config);

    assert_eq!(chunks, vec![text.to_string()]);
}

#[test]
fn empty_text_is_single_empty_chunk() {
    let chunks = split_text("", &SplitterConfig::default());
    assert_eq!(chunks, vec![String::new()]);
}

#[test]
fn splitting_is_deterministic() {
    let config = SplitterConfig::default();
    let text = sentence_text(100);

    let first = split_text(&text, &config);
    let second = split_text(&text, &config);

    assert!(first.len() > 1);
    assert_eq!(first, second);
}

#[test]
fn chunks_respect_size_bound() {
    let config = SplitterConfig::default();
    let text = sentence_text(200);

    for chunk in split_text(&text, &config) {
        assert!(chunk.chars().count() <= config.chunk_size + SENTENCE_SCAN_WINDOW);
    }
}

#[test]
fn chunks_cut_at_sentence_boundaries() {
    let config = SplitterConfig::default();
    let text = sentence_text(100);

    let chunks = split_text(&text, &config);

    // Every non-final chunk should end just after a sentence terminator,
    // since the text has a terminator within the scan window of every
    // window boundary.
    for chunk in &chunks[..chunks.len() - 1] {
        let last = chunk.chars().next_back().expect("chunk is non-empty");
        assert!(
            last == '.' || last.is_whitespace(),
            "chunk ended mid-sentence: ...{:?}",
            chunk.chars().rev().take(20).collect::<String>()
        );
    }
}

#[test]
fn overlap_regions_reconstruct_original_text() {
    let config = SplitterConfig::default();
    let text = sentence_text(150);

    let chunks = split_text(&text, &config);
    assert!(chunks.len() > 1);

    let mut rebuilt: String = chunks[0].clone();
    for chunk in &chunks[1..] {
        rebuilt.extend(chunk.chars().skip(config.overlap));
    }

    assert_eq!(rebuilt, text);
}

#[test]
fn overlap_larger_than_window_still_terminates() {
    let config = SplitterConfig {
        chunk_size: 50,
        overlap: 50,
    };
    let text = "x".repeat(500);

    let chunks = split_text(&text, &config);

    // With overlap >= window the scan must fall back to advancing by whole
    // windows instead of looping forever.
    assert_eq!(chunks.len(), 10);
    assert!(chunks.iter().all(|c| c.chars().count() == 50));
}

#[test]
fn multibyte_text_splits_on_character_boundaries() {
    let config = SplitterConfig {
        chunk_size: 10,
        overlap: 2,
    };
    let text = "héllö wörld çafé ünïcode tëxt hölds tögether".repeat(3);

    let chunks = split_text(&text, &config);

    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert!(chunk.chars().count() <= config.chunk_size);
    }
}

#[test]
fn no_terminator_cuts_at_raw_boundary() {
    let config = SplitterConfig {
        chunk_size: 100,
        overlap: 10,
    };
    let text = "word ".repeat(100);

    let chunks = split_text(&text, &config);

    assert!(chunks.len() > 1);
    assert_eq!(chunks[0].chars().count(), 100);
}
