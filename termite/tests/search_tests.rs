use std::fs;
use tempfile::{tempdir, TempDir};
use termite::{build_index, IndexPaths, IndexReader, QueryEngine, TermDictionary};

fn build_fixture(lines: &[&str]) -> (TempDir, IndexReader) {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("docs.tsv");
    fs::write(&corpus, lines.join("\n")).unwrap();
    let paths = IndexPaths::new(dir.path().join("index"));
    build_index(&corpus, &paths).unwrap();
    let reader = IndexReader::open(&paths).unwrap();
    (dir, reader)
}

fn ids(reader: &IndexReader, query: &str) -> Vec<u32> {
    QueryEngine::new(reader).eval(query).unwrap()
}

#[test]
fn two_doc_corpus_boolean_operators() {
    let (_dir, reader) = build_fixture(&[
        "http://a\tTitle A\tfoo bar foo",
        "http://b\tTitle B\tbar baz",
    ]);
    assert_eq!(ids(&reader, "foo"), [0]);
    assert_eq!(ids(&reader, "bar"), [0, 1]);
    assert_eq!(ids(&reader, "foo && bar"), [0]);
    assert_eq!(ids(&reader, "foo | baz"), [0, 1]);
    assert_eq!(ids(&reader, "bar !baz"), [0]);
    assert_eq!(ids(&reader, "foo bar"), [0]);
    assert_eq!(ids(&reader, "(foo | baz) !foo"), [1]);
    assert_eq!(ids(&reader, "FOO"), [0]);
}

#[test]
fn unknown_term_and_empty_query() {
    let (_dir, reader) = build_fixture(&["http://a\tA\tfoo"]);
    assert!(ids(&reader, "missing").is_empty());
    assert!(ids(&reader, "missing | absent").is_empty());
    assert!(ids(&reader, "").is_empty());
    assert!(ids(&reader, "   ").is_empty());
}

#[test]
fn prefix_not_is_empty_by_default() {
    let (_dir, reader) = build_fixture(&["http://a\tA\tfoo bar", "http://b\tB\tbar"]);
    assert!(ids(&reader, "!foo").is_empty());
    assert!(ids(&reader, "bar && !foo").is_empty());
    // infix ! is unaffected by the stubbed prefix form
    assert_eq!(ids(&reader, "bar !foo"), [1]);
}

#[test]
fn prefix_not_with_complement_configured() {
    let (_dir, reader) = build_fixture(&[
        "http://a\tA\tfoo bar",
        "http://b\tB\tbar",
        "http://c\tC\tbaz",
    ]);
    let mut engine = QueryEngine::new(&reader).with_complement();
    assert_eq!(engine.eval("!foo").unwrap(), [1, 2]);
    assert_eq!(engine.eval("!foo && bar").unwrap(), [1]);
    assert_eq!(engine.eval("!quux").unwrap(), [0, 1, 2]);
    assert_eq!(engine.eval("!(foo | baz)").unwrap(), [1]);
}

#[test]
fn lenient_parsing_tolerates_unbalanced_input() {
    let (_dir, reader) = build_fixture(&["http://a\tA\tfoo bar"]);
    assert_eq!(ids(&reader, "foo)"), [0]);
    assert_eq!(ids(&reader, "((foo)"), [0]);
    assert_eq!(ids(&reader, "foo) | missing"), [0]);
    assert_eq!(ids(&reader, "foo @#$"), [0]);
    assert_eq!(ids(&reader, "& foo"), [0]);
    assert_eq!(ids(&reader, "foo &"), [0]);
}

#[test]
fn nested_groups_reset_precedence() {
    let (_dir, reader) = build_fixture(&[
        "http://a\tA\tfoo bar",
        "http://b\tB\tfoo baz",
        "http://c\tC\tbar baz",
    ]);
    assert_eq!(ids(&reader, "foo && (bar | baz)"), [0, 1]);
    assert_eq!(ids(&reader, "(foo && bar) | (bar && baz)"), [0, 2]);
    assert_eq!(ids(&reader, "((foo) && ((bar | baz)))"), [0, 1]);
}

#[test]
fn record_with_empty_body_is_skipped() {
    let (_dir, reader) = build_fixture(&[
        "http://a\tA\tfoo",
        "http://b\tB\t",
        "http://c\tC",
        "http://d\tD\tfoo qux",
    ]);
    assert_eq!(reader.doc_count(), 2);
    assert_eq!(ids(&reader, "foo"), [0, 1]);
    let (url, _) = reader.doc(1).unwrap();
    assert_eq!(url, "http://d");
}

#[test]
fn empty_corpus_builds_and_serves() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("docs.tsv");
    fs::write(&corpus, "").unwrap();
    let paths = IndexPaths::new(dir.path().join("index"));
    let stats = build_index(&corpus, &paths).unwrap();
    assert_eq!(stats.num_docs, 0);
    assert_eq!(stats.num_terms, 0);
    for p in [paths.docs_index(), paths.docs_data(), paths.term_index(), paths.postings()] {
        assert_eq!(fs::metadata(&p).unwrap().len(), 0, "{}", p.display());
    }
    let reader = IndexReader::open(&paths).unwrap();
    assert_eq!(reader.doc_count(), 0);
    assert!(QueryEngine::new(&reader).eval("anything").unwrap().is_empty());
}

#[test]
fn bare_term_round_trips_exact_doc_set() {
    let mut lines = Vec::new();
    for i in 0..20 {
        let body = if i % 3 == 0 { "alpha beta" } else { "beta" };
        lines.push(format!("http://{i}\tDoc {i}\t{body}"));
    }
    let refs: Vec<&str> = lines.iter().map(|s| s.as_str()).collect();
    let (_dir, reader) = build_fixture(&refs);
    let expected: Vec<u32> = (0..20).filter(|i| i % 3 == 0).collect();
    assert_eq!(ids(&reader, "alpha"), expected);
    assert_eq!(ids(&reader, "beta"), (0..20).collect::<Vec<u32>>());
}

#[test]
fn duplicate_tokens_yield_single_posting() {
    let (_dir, reader) = build_fixture(&["http://a\tA\tfoo foo foo bar foo"]);
    assert_eq!(ids(&reader, "foo"), [0]);
    assert_eq!(ids(&reader, "foo && bar"), [0]);
}

#[test]
fn dictionary_is_sorted_and_unique() {
    let (_dir, reader) = build_fixture(&[
        "http://a\tA\tzebra apple Mango apple 42 banana",
        "http://b\tB\tapple zoo",
    ]);
    let terms: Vec<&str> = reader
        .dictionary()
        .entries()
        .iter()
        .map(|e| e.term.as_str())
        .collect();
    assert_eq!(terms, ["42", "apple", "banana", "mango", "zebra", "zoo"]);
    assert!(terms.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn docstore_round_trip_after_build() {
    let (_dir, reader) = build_fixture(&[
        "http://one\tFirst \"Doc\"\tfoo",
        "http://two\tСтатья о поиске\tbar",
    ]);
    assert_eq!(
        reader.doc(0).unwrap(),
        ("http://one".to_string(), "First \"Doc\"".to_string())
    );
    assert_eq!(
        reader.doc(1).unwrap(),
        ("http://two".to_string(), "Статья о поиске".to_string())
    );
}

#[test]
fn truncated_term_index_fails_loudly() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("docs.tsv");
    fs::write(&corpus, "http://a\tA\tfoo bar baz").unwrap();
    let paths = IndexPaths::new(dir.path().join("index"));
    build_index(&corpus, &paths).unwrap();

    let term_path = paths.term_index();
    let len = fs::metadata(&term_path).unwrap().len();
    let f = fs::OpenOptions::new().write(true).open(&term_path).unwrap();
    f.set_len(len - 3).unwrap();
    drop(f);

    let err = TermDictionary::load(&paths).unwrap_err();
    assert!(format!("{err:#}").contains("truncated term index"));
}

#[test]
fn oversized_postings_count_fails_loudly() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("docs.tsv");
    fs::write(&corpus, "http://a\tA\tfoo").unwrap();
    let paths = IndexPaths::new(dir.path().join("index"));
    build_index(&corpus, &paths).unwrap();

    // dictionary entry for "foo" rewritten with a count far past the
    // four bytes the postings file actually holds
    let mut term_file = Vec::new();
    term_file.extend_from_slice(&3u16.to_le_bytes());
    term_file.extend_from_slice(b"foo");
    term_file.extend_from_slice(&0u64.to_le_bytes());
    term_file.extend_from_slice(&u32::MAX.to_le_bytes());
    fs::write(paths.term_index(), &term_file).unwrap();

    let reader = IndexReader::open(&paths).unwrap();
    let err = reader.postings("foo").unwrap_err();
    assert!(format!("{err:#}").contains("truncated postings"));
}

#[test]
fn missing_index_files_fail_to_open() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path().join("absent"));
    assert!(IndexReader::open(&paths).is_err());
}

#[test]
fn result_rendering_caps_at_fifty() {
    let mut lines = Vec::new();
    for i in 0..60 {
        lines.push(format!("http://{i}\tDoc {i}\tcommon"));
    }
    let refs: Vec<&str> = lines.iter().map(|s| s.as_str()).collect();
    let (_dir, reader) = build_fixture(&refs);
    let matched = ids(&reader, "common");
    assert_eq!(matched.len(), 60);
    let resp = termite::render_results(&reader, &matched, 0.0).unwrap();
    assert_eq!(resp.count, 60);
    assert_eq!(resp.results.len(), 50);
    assert_eq!(resp.results[0].id, 0);
    assert_eq!(resp.results[49].id, 49);
    assert_eq!(resp.results[0].url, "http://0");
    assert_eq!(resp.results[0].title, "Doc 0");
}
