//! Tree builder. Walks the remote table of contents depth-first, fetches leaf content, and prunes empty branches.

use crate::model::{Chapter, Section, TreeNode};
use crate::source::{fetch_leaf_text, CodeSource, SourceError};
use std::time::Duration;

/// Default pause after each leaf fetch, keeping under the API's rate tolerance.
pub const DEFAULT_PACING: Duration = Duration::from_millis(400);

/// Options for a build: progress callback, pacing delay, and how to wait it out.
pub struct BuildOptions<'a> {
    /// Called as `(done, total)` before each leaf fetch.
    pub progress: Option<&'a dyn Fn(u32, u32)>,
    /// Sleep after each leaf fetch. Zero disables pacing.
    pub pacing: Duration,
    /// Replaces `std::thread::sleep` for the pacing wait when set.
    pub sleep: Option<&'a dyn Fn(Duration)>,
}

impl Default for BuildOptions<'_> {
    fn default() -> Self {
        Self {
            progress: None,
            pacing: DEFAULT_PACING,
            sleep: None,
        }
    }
}

/// Fetch the table of contents and build every chapter that ends up with content.
///
/// Chapters and sections keep the remote order. Any fetch failure aborts the whole build.
pub fn build_tree(
    source: &mut dyn CodeSource,
    options: &BuildOptions<'_>,
) -> Result<Vec<Chapter>, SourceError> {
    let toc = source.fetch_toc()?;
    let root = TreeNode::new(&toc);
    if toc.get("Children").and_then(|c| c.as_array()).is_none() {
        log::warn!("Table of contents has no Children array; nothing to build");
    }
    let total = count_leaves(root);
    log::info!(
        "Table of contents has {} chapter node(s) and {} leaf section(s)",
        root.children().count(),
        total
    );

    let mut walker = Walker {
        source,
        options,
        done: 0,
        total,
    };
    let mut chapters = Vec::new();
    for node in root.children() {
        let chapter = walker.chapter(node)?;
        if chapter.sections.is_empty() {
            log::debug!("Dropping chapter {:?}: no sections with content", chapter.title);
            continue;
        }
        chapters.push(chapter);
    }
    Ok(chapters)
}

/// Number of leaf fetches a build of this tree will make.
///
/// Counts leaves below chapter level, skipping subtrees under nodes without an id.
pub fn count_leaves(root: TreeNode<'_>) -> u32 {
    fn section_leaves(node: TreeNode<'_>) -> u32 {
        if node.id().is_none() {
            return 0;
        }
        u32::from(node.is_leaf()) + node.children().map(section_leaves).sum::<u32>()
    }
    root.children()
        .flat_map(|chapter| chapter.children())
        .map(section_leaves)
        .sum()
}

struct Walker<'s, 'o> {
    source: &'s mut dyn CodeSource,
    options: &'o BuildOptions<'o>,
    done: u32,
    total: u32,
}

impl Walker<'_, '_> {
    fn chapter(&mut self, node: TreeNode<'_>) -> Result<Chapter, SourceError> {
        let id = node.raw_id();
        let url = id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(|id| self.source.job().node_url(id))
            .unwrap_or_default();
        let mut sections = Vec::new();
        for child in node.children() {
            if let Some(section) = self.section(child)? {
                sections.push(section);
            }
        }
        Ok(Chapter {
            id,
            title: node.heading(),
            url,
            sections,
        })
    }

    /// Build one section, or `None` when it has no id or nothing survives below it.
    fn section(&mut self, node: TreeNode<'_>) -> Result<Option<Section>, SourceError> {
        let id = match node.id() {
            Some(id) => id,
            None => return Ok(None),
        };
        let url = self.source.job().node_url(&id);

        let text = if node.is_leaf() {
            self.fetch_leaf(&id)?
        } else {
            String::new()
        };

        let mut children = Vec::new();
        for child in node.children() {
            if let Some(section) = self.section(child)? {
                children.push(section);
            }
        }

        let section = Section {
            id,
            title: node.heading(),
            url,
            text,
            children,
        };
        Ok(section.has_content().then_some(section))
    }

    fn fetch_leaf(&mut self, id: &str) -> Result<String, SourceError> {
        self.done += 1;
        if let Some(progress) = self.options.progress {
            progress(self.done, self.total);
        }
        log::debug!("Fetching section {} ({}/{})", id, self.done, self.total);
        let text = fetch_leaf_text(self.source, id)?;
        if text.is_empty() {
            log::debug!("Section {} has no text after cleaning", id);
        }
        self.pause();
        Ok(text)
    }

    fn pause(&self) {
        let pacing = self.options.pacing;
        if pacing.is_zero() {
            return;
        }
        match self.options.sleep {
            Some(sleep) => sleep(pacing),
            None => std::thread::sleep(pacing),
        }
    }
}
