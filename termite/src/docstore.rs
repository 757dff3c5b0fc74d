use crate::{codec, DocId, IndexPaths};
use anyhow::{bail, Context, Result};
use parking_lot::Mutex;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Seek, SeekFrom, Write};

pub struct DocStoreWriter {
    offsets: BufWriter<File>,
    data: BufWriter<File>,
    data_len: u64,
    num_docs: u32,
}

impl DocStoreWriter {
    pub fn create(paths: &IndexPaths) -> Result<Self> {
        create_dir_all(&paths.root)
            .with_context(|| format!("creating index directory {}", paths.root.display()))?;
        let offsets = File::create(paths.docs_index())
            .with_context(|| format!("creating {}", paths.docs_index().display()))?;
        let data = File::create(paths.docs_data())
            .with_context(|| format!("creating {}", paths.docs_data().display()))?;
        Ok(Self {
            offsets: BufWriter::new(offsets),
            data: BufWriter::new(data),
            data_len: 0,
            num_docs: 0,
        })
    }

    /// Appends one document and returns its dense id. The data offset is
    /// recorded before the record bytes so entry `doc_id` of the offset
    /// table always sits at byte `doc_id * 8`.
    pub fn append(&mut self, url: &str, title: &str) -> Result<DocId> {
        let doc_id = self.num_docs;
        codec::write_u64(&mut self.offsets, self.data_len)?;
        codec::write_str(&mut self.data, url)?;
        codec::write_str(&mut self.data, title)?;
        self.data_len += 2 + url.len() as u64 + 2 + title.len() as u64;
        self.num_docs += 1;
        Ok(doc_id)
    }

    pub fn finish(mut self) -> Result<u32> {
        self.offsets.flush()?;
        self.data.flush()?;
        Ok(self.num_docs)
    }
}

pub struct DocStoreReader {
    offsets: Mutex<File>,
    data: Mutex<File>,
    doc_count: u32,
}

impl DocStoreReader {
    pub fn open(paths: &IndexPaths) -> Result<Self> {
        let offsets = File::open(paths.docs_index())
            .with_context(|| format!("opening {}", paths.docs_index().display()))?;
        let doc_count = (offsets.metadata()?.len() / 8) as u32;
        let data = File::open(paths.docs_data())
            .with_context(|| format!("opening {}", paths.docs_data().display()))?;
        Ok(Self {
            offsets: Mutex::new(offsets),
            data: Mutex::new(data),
            doc_count,
        })
    }

    pub fn doc_count(&self) -> u32 {
        self.doc_count
    }

    /// Resolves an id to its (url, title) pair in two seeks: the offset
    /// table at `doc_id * 8`, then the record itself.
    pub fn get(&self, doc_id: DocId) -> Result<(String, String)> {
        if doc_id >= self.doc_count {
            bail!("document id {doc_id} out of range (store holds {})", self.doc_count);
        }
        let offset = {
            let mut f = self.offsets.lock();
            f.seek(SeekFrom::Start(doc_id as u64 * 8))?;
            codec::read_u64(&mut *f)?
        };
        let mut f = self.data.lock();
        f.seek(SeekFrom::Start(offset))?;
        let url = codec::read_str(&mut *f)?;
        let title = codec::read_str(&mut *f)?;
        Ok((url, title))
    }
}
