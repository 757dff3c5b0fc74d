pub mod builder;
pub mod codec;
pub mod docstore;
pub mod index;
pub mod ops;
pub mod query;
pub mod render;
pub mod tokenizer;

pub use builder::{build_index, BuildStats};
pub use docstore::{DocStoreReader, DocStoreWriter};
pub use index::{IndexReader, PostingsFile, TermDictionary, TermEntry};
pub use query::{Lexer, QueryEngine, Token};
pub use render::{render_results, SearchHit, SearchResponse, RESULT_LIMIT};

use std::path::{Path, PathBuf};

pub type DocId = u32;

/// The four fixed file names of a built index under one root directory.
pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    pub fn docs_index(&self) -> PathBuf {
        self.root.join("docs_index.bin")
    }

    pub fn docs_data(&self) -> PathBuf {
        self.root.join("docs_data.bin")
    }

    pub fn term_index(&self) -> PathBuf {
        self.root.join("term_index.bin")
    }

    pub fn postings(&self) -> PathBuf {
        self.root.join("postings.bin")
    }
}
