use crate::docstore::DocStoreReader;
use crate::{codec, DocId, IndexPaths};
use anyhow::{bail, Context, Result};
use parking_lot::Mutex;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermEntry {
    pub term: String,
    pub postings_offset: u64,
    pub postings_count: u32,
}

/// In-memory ordered array of dictionary entries, loaded once. The file is
/// written sorted by the builder; load trusts that order and never re-sorts.
#[derive(Debug)]
pub struct TermDictionary {
    entries: Vec<TermEntry>,
}

impl TermDictionary {
    pub fn load(paths: &IndexPaths) -> Result<Self> {
        let path = paths.term_index();
        let file = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
        let total = file.metadata()?.len();
        let mut reader = BufReader::new(file);
        let mut entries = Vec::new();
        let mut consumed: u64 = 0;
        while consumed < total {
            let entry = read_entry(&mut reader)
                .with_context(|| format!("truncated term index {}", path.display()))?;
            consumed += 2 + entry.term.len() as u64 + 8 + 4;
            entries.push(entry);
        }
        Ok(Self { entries })
    }

    pub fn lookup(&self, term: &str) -> Option<&TermEntry> {
        self.entries
            .binary_search_by(|e| e.term.as_str().cmp(term))
            .ok()
            .map(|i| &self.entries[i])
    }

    pub fn entries(&self) -> &[TermEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn read_entry<R: Read>(r: &mut R) -> Result<TermEntry> {
    let term = codec::read_str(r)?;
    let postings_offset = codec::read_u64(r)?;
    let postings_count = codec::read_u32(r)?;
    Ok(TermEntry { term, postings_offset, postings_count })
}

pub struct PostingsFile {
    file: Mutex<File>,
    len: u64,
}

impl PostingsFile {
    pub fn open(paths: &IndexPaths) -> Result<Self> {
        let path = paths.postings();
        let file = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
        let len = file.metadata()?.len();
        Ok(Self { file: Mutex::new(file), len })
    }

    /// Seeks to the entry's offset and reads exactly `postings_count` ids.
    /// The run must lie inside the file; an entry pointing past the end
    /// reads as truncation before any buffer is sized.
    pub fn read(&self, entry: &TermEntry) -> Result<Vec<DocId>> {
        let bytes = entry.postings_count as u64 * 4;
        match entry.postings_offset.checked_add(bytes) {
            Some(end) if end <= self.len => {}
            _ => bail!("truncated postings for term {:?}", entry.term),
        }
        let mut buf = vec![0u8; bytes as usize];
        {
            let mut f = self.file.lock();
            f.seek(SeekFrom::Start(entry.postings_offset))?;
            f.read_exact(&mut buf)
                .with_context(|| format!("truncated postings for term {:?}", entry.term))?;
        }
        let mut ids = Vec::with_capacity(entry.postings_count as usize);
        let mut rest = &buf[..];
        for _ in 0..entry.postings_count {
            ids.push(codec::read_u32(&mut rest)?);
        }
        Ok(ids)
    }
}

/// Read-only handle over a built index: the loaded dictionary plus open
/// file handles for postings and document lookups. Nothing is mutated
/// after open, so one reader can be shared across concurrent queries.
pub struct IndexReader {
    dictionary: TermDictionary,
    postings_file: PostingsFile,
    docs: DocStoreReader,
}

impl IndexReader {
    /// Opens all four index files; any missing file is an error.
    pub fn open(paths: &IndexPaths) -> Result<Self> {
        let reader = Self {
            dictionary: TermDictionary::load(paths)?,
            postings_file: PostingsFile::open(paths)?,
            docs: DocStoreReader::open(paths)?,
        };
        tracing::debug!(
            num_terms = reader.dictionary.len(),
            num_docs = reader.docs.doc_count(),
            "index opened"
        );
        Ok(reader)
    }

    /// Postings list for a term, empty when the term is not in the corpus.
    pub fn postings(&self, term: &str) -> Result<Vec<DocId>> {
        match self.dictionary.lookup(term) {
            Some(entry) => self.postings_file.read(entry),
            None => Ok(Vec::new()),
        }
    }

    pub fn doc(&self, doc_id: DocId) -> Result<(String, String)> {
        self.docs.get(doc_id)
    }

    pub fn doc_count(&self) -> u32 {
        self.docs.doc_count()
    }

    pub fn dictionary(&self) -> &TermDictionary {
        &self.dictionary
    }
}
