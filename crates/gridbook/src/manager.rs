//! Workbook lifecycle and the dual-view store
//!
//! A [`WorkbookManager`] owns two synchronized in-memory views of one on-disk
//! workbook: a formula-preserving view (authoritative for writes and
//! structure) and a calculated-value view (authoritative for reads). The
//! views are reloaded together after every save; that reload is the only
//! point where freshly written formulas can pick up computed results.

use gridbook_core::{validate_sheet_name, Error, Result, Workbook};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// The two views of one open workbook
#[derive(Debug)]
pub(crate) struct Views {
    /// Formula-preserving view: raw values and formula text verbatim
    pub(crate) formulas: Workbook,
    /// Calculated-value view: last-computed results as stored in the file
    pub(crate) values: Workbook,
}

/// Owns one workbook document end to end: lifecycle, sheet management, and
/// (via the accessor and traversal modules) all cell access
///
/// Single-threaded by design: one manager per open workbook, no internal
/// locking, callers needing concurrent access serialize externally.
#[derive(Debug, Default)]
pub struct WorkbookManager {
    path: Option<PathBuf>,
    views: Option<Views>,
}

impl WorkbookManager {
    /// Create a manager with no workbook open
    ///
    /// Every data operation fails with [`Error::NoWorkbookLoaded`] until
    /// [`create`](Self::create) or [`open`](Self::open) is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager bound to a path: loads the file if it exists,
    /// otherwise creates a fresh workbook there
    pub fn with_path(path: &Path) -> Result<Self> {
        let mut manager = Self::new();
        if path.exists() {
            manager.open(path)?;
            info!(path = %path.display(), "initialized manager with existing file");
        } else {
            manager.create(Some(path))?;
            info!(path = %path.display(), "initialized manager with new file");
        }
        Ok(manager)
    }

    /// Create a fresh workbook with one default sheet
    ///
    /// With a path, the workbook is saved immediately; with `None` it exists
    /// only in memory until [`save_to`](Self::save_to) gives it a home.
    pub fn create(&mut self, path: Option<&Path>) -> Result<()> {
        let workbook = Workbook::new();
        self.views = Some(Views {
            formulas: workbook.clone(),
            values: workbook,
        });
        self.path = path.map(Path::to_path_buf);

        if self.path.is_some() {
            self.save()?;
        }
        info!("created new workbook");
        Ok(())
    }

    /// Load an existing workbook from disk into both views
    pub fn open(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        let (formulas, values) = gridbook_xlsx::read_views(path).map_err(Error::codec)?;
        self.views = Some(Views { formulas, values });
        self.path = Some(path.to_path_buf());
        info!(path = %path.display(), "loaded workbook");
        Ok(())
    }

    /// Save to the workbook's stored path
    pub fn save(&mut self) -> Result<()> {
        let path = self
            .path
            .clone()
            .ok_or(Error::MissingArgument("file path"))?;
        self.save_to(&path)
    }

    /// Save to the given path, which becomes the workbook's stored path
    ///
    /// Persists the formula view, then reloads both views from the freshly
    /// written bytes. The reload is mandatory: it is the only mechanism that
    /// keeps the calculated-value view aligned with what is actually on disk.
    pub fn save_to(&mut self, path: &Path) -> Result<()> {
        let views = self.views.as_ref().ok_or(Error::NoWorkbookLoaded)?;

        gridbook_xlsx::write_views(&views.formulas, path).map_err(Error::codec)?;

        let (formulas, values) = gridbook_xlsx::read_views(path).map_err(Error::codec)?;
        self.views = Some(Views { formulas, values });
        self.path = Some(path.to_path_buf());
        info!(path = %path.display(), "saved workbook");
        Ok(())
    }

    /// Close the workbook, dropping both views
    pub fn close(&mut self) {
        if self.views.take().is_some() {
            info!("closed workbook");
        }
    }

    /// Whether a workbook is currently open
    pub fn is_open(&self) -> bool {
        self.views.is_some()
    }

    /// The workbook's file path, if it has one
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of sheets in the workbook
    pub fn sheet_count(&self) -> Result<usize> {
        Ok(self.views()?.formulas.sheet_count())
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> Result<Vec<String>> {
        Ok(self.views()?.formulas.sheet_names())
    }

    /// Populated extent of a sheet as (max_row, max_col); (0, 0) when empty
    pub fn sheet_extent(&self, name: &str) -> Result<(u32, u32)> {
        let sheet = self.views()?.formulas.sheet(name)?;
        Ok((sheet.max_row(), sheet.max_col()))
    }

    /// Create a sheet in both views
    ///
    /// Creating a sheet that already exists is a no-op, not an error. The
    /// name is validated before either view is touched, so the views can
    /// never end up with divergent sheet sets.
    pub fn create_sheet(&mut self, name: &str) -> Result<()> {
        validate_sheet_name(name)?;
        let views = self.views_mut()?;

        if views.formulas.has_sheet(name) {
            warn!(sheet = name, "sheet already exists");
            return Ok(());
        }

        views.formulas.add_sheet(name)?;
        views.values.add_sheet(name)?;
        info!(sheet = name, "created sheet");
        Ok(())
    }

    /// Delete a sheet from both views
    ///
    /// Refuses to delete the workbook's only remaining sheet.
    pub fn delete_sheet(&mut self, name: &str) -> Result<()> {
        let views = self.views_mut()?;

        if !views.formulas.has_sheet(name) {
            return Err(Error::SheetNotFound(name.to_string()));
        }
        if views.formulas.sheet_count() == 1 {
            return Err(Error::LastSheet(name.to_string()));
        }

        views.formulas.remove_sheet(name)?;
        views.values.remove_sheet(name)?;
        info!(sheet = name, "deleted sheet");
        Ok(())
    }

    pub(crate) fn views(&self) -> Result<&Views> {
        self.views.as_ref().ok_or(Error::NoWorkbookLoaded)
    }

    pub(crate) fn views_mut(&mut self) -> Result<&mut Views> {
        self.views.as_mut().ok_or(Error::NoWorkbookLoaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operations_require_workbook() {
        let manager = WorkbookManager::new();
        assert!(!manager.is_open());
        assert!(matches!(
            manager.sheet_count(),
            Err(Error::NoWorkbookLoaded)
        ));
        assert!(matches!(
            manager.sheet_names(),
            Err(Error::NoWorkbookLoaded)
        ));
    }

    #[test]
    fn test_in_memory_create() {
        let mut manager = WorkbookManager::new();
        manager.create(None).unwrap();

        assert!(manager.is_open());
        assert_eq!(manager.sheet_count().unwrap(), 1);
        assert_eq!(manager.sheet_names().unwrap(), vec!["Sheet1"]);

        // No path yet: saving needs one
        assert!(matches!(manager.save(), Err(Error::MissingArgument(_))));
    }

    #[test]
    fn test_create_sheet_mirrors_both_views() {
        let mut manager = WorkbookManager::new();
        manager.create(None).unwrap();
        manager.create_sheet("Data").unwrap();

        let views = manager.views().unwrap();
        assert!(views.formulas.has_sheet("Data"));
        assert!(views.values.has_sheet("Data"));
    }

    #[test]
    fn test_create_existing_sheet_is_noop() {
        let mut manager = WorkbookManager::new();
        manager.create(None).unwrap();
        manager.create_sheet("Data").unwrap();
        manager.create_sheet("Data").unwrap();

        assert_eq!(manager.sheet_count().unwrap(), 2);
    }

    #[test]
    fn test_invalid_sheet_name_mutates_nothing() {
        let mut manager = WorkbookManager::new();
        manager.create(None).unwrap();
        assert!(manager.create_sheet("bad/name").is_err());

        let views = manager.views().unwrap();
        assert_eq!(views.formulas.sheet_count(), 1);
        assert_eq!(views.values.sheet_count(), 1);
    }

    #[test]
    fn test_delete_sheet() {
        let mut manager = WorkbookManager::new();
        manager.create(None).unwrap();
        manager.create_sheet("Data").unwrap();
        manager.delete_sheet("Data").unwrap();

        let views = manager.views().unwrap();
        assert!(!views.formulas.has_sheet("Data"));
        assert!(!views.values.has_sheet("Data"));
    }

    #[test]
    fn test_delete_last_sheet_refused() {
        let mut manager = WorkbookManager::new();
        manager.create(None).unwrap();

        assert!(matches!(
            manager.delete_sheet("Sheet1"),
            Err(Error::LastSheet(_))
        ));
        assert_eq!(manager.sheet_count().unwrap(), 1);
    }

    #[test]
    fn test_delete_missing_sheet() {
        let mut manager = WorkbookManager::new();
        manager.create(None).unwrap();

        assert!(matches!(
            manager.delete_sheet("Missing"),
            Err(Error::SheetNotFound(_))
        ));
    }

    #[test]
    fn test_close() {
        let mut manager = WorkbookManager::new();
        manager.create(None).unwrap();
        manager.close();

        assert!(!manager.is_open());
        assert!(matches!(
            manager.sheet_count(),
            Err(Error::NoWorkbookLoaded)
        ));
    }
}
