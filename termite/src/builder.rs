use crate::docstore::DocStoreWriter;
use crate::tokenizer::tokenize;
use crate::{codec, DocId, IndexPaths};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

#[derive(Debug, Default, Clone)]
pub struct BuildStats {
    pub num_docs: u32,
    pub num_pairs: u64,
    pub num_terms: u64,
    pub body_bytes: u64,
}

/// Builds the four index files under `paths.root` from a corpus of
/// `url \t title \t body` lines. Records with an empty body field get no
/// document id and are not stored. Runs in three phases: parse and store
/// documents while emitting (term, doc_id) pairs, sort the pairs, then
/// merge equal-term runs into postings and dictionary entries.
pub fn build_index<P: AsRef<Path>>(input: P, paths: &IndexPaths) -> Result<BuildStats> {
    let start = Instant::now();
    let input = input.as_ref();
    let corpus =
        File::open(input).with_context(|| format!("opening corpus {}", input.display()))?;
    let reader = BufReader::new(corpus);

    let mut docs = DocStoreWriter::create(paths)?;
    let mut pairs: Vec<(String, DocId)> = Vec::new();
    let mut body_bytes: u64 = 0;

    for line in reader.lines() {
        let line = line?;
        let mut fields = line.split('\t');
        let url = fields.next().unwrap_or("");
        let title = fields.next().unwrap_or("");
        let body = fields.next().unwrap_or("");
        if body.is_empty() {
            continue;
        }
        let doc_id = docs.append(url, title)?;
        body_bytes += body.len() as u64;
        for token in tokenize(body) {
            pairs.push((token, doc_id));
        }
        if (doc_id + 1) % 1000 == 0 {
            tracing::info!(num_docs = doc_id + 1, "parsed documents");
        }
    }
    let num_docs = docs.finish()?;
    let num_pairs = pairs.len() as u64;

    tracing::info!(num_docs, num_pairs, "sorting term pairs");
    pairs.sort_unstable();

    let term_index = File::create(paths.term_index())
        .with_context(|| format!("creating {}", paths.term_index().display()))?;
    let postings = File::create(paths.postings())
        .with_context(|| format!("creating {}", paths.postings().display()))?;
    let mut term_out = BufWriter::new(term_index);
    let mut postings_out = BufWriter::new(postings);

    let mut postings_offset: u64 = 0;
    let mut num_terms: u64 = 0;
    let mut i = 0;
    while i < pairs.len() {
        let mut j = i + 1;
        while j < pairs.len() && pairs[j].0 == pairs[i].0 {
            j += 1;
        }
        // One term's run: consecutive duplicate ids collapse to one posting,
        // so the list stays ascending and unique.
        let offset = postings_offset;
        let mut count: u32 = 0;
        let mut last: Option<DocId> = None;
        for pair in &pairs[i..j] {
            if last != Some(pair.1) {
                codec::write_u32(&mut postings_out, pair.1)?;
                count += 1;
                last = Some(pair.1);
            }
        }
        postings_offset += count as u64 * 4;
        codec::write_str(&mut term_out, &pairs[i].0)?;
        codec::write_u64(&mut term_out, offset)?;
        codec::write_u32(&mut term_out, count)?;
        num_terms += 1;
        i = j;
    }
    term_out.flush()?;
    postings_out.flush()?;

    let stats = BuildStats { num_docs, num_pairs, num_terms, body_bytes };
    tracing::info!(
        num_docs = stats.num_docs,
        num_pairs = stats.num_pairs,
        num_terms = stats.num_terms,
        elapsed_sec = start.elapsed().as_secs_f64(),
        "index written"
    );
    Ok(stats)
}
