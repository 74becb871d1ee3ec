use crate::combine::CombineError;
use crate::container::Group;
use crate::schema::GroupName;
use crate::store::SaveFormat;

use super::error::PathError;
use super::pointer::{PathInput, ProductPointer};
use super::product::LogicalProduct;
use super::view::CombinedView;

/// One processing session's data model: a pointer per logical product.
///
/// The session owns its pointers; callers get borrowed read-only views. The
/// raw pointer is usually assigned at construction, derived pointers as
/// calibration stages write their outputs.
#[derive(Debug)]
pub struct EchoData {
    raw: ProductPointer,
    sv: ProductPointer,
    sv_clean: ProductPointer,
    target_strength: ProductPointer,
    mvbs: ProductPointer,
}

impl Default for EchoData {
    fn default() -> Self {
        EchoData {
            raw: ProductPointer::new(LogicalProduct::Raw),
            sv: ProductPointer::new(LogicalProduct::Sv),
            sv_clean: ProductPointer::new(LogicalProduct::SvClean),
            target_strength: ProductPointer::new(LogicalProduct::TargetStrength),
            mvbs: ProductPointer::new(LogicalProduct::Mvbs),
        }
    }
}

impl EchoData {
    /// A session with no products assigned.
    pub fn new() -> Self {
        EchoData::default()
    }

    /// A session pointing its raw product at `input` (a file, an ordered
    /// list, or a directory).
    pub fn open_raw(input: impl Into<PathInput>) -> Result<Self, PathError> {
        let mut session = EchoData::new();
        session.set_path(LogicalProduct::Raw, Some(input.into()))?;
        Ok(session)
    }

    /// Borrow a product's pointer record.
    pub fn pointer(&self, product: LogicalProduct) -> &ProductPointer {
        match product {
            LogicalProduct::Raw => &self.raw,
            LogicalProduct::Sv => &self.sv,
            LogicalProduct::SvClean => &self.sv_clean,
            LogicalProduct::TargetStrength => &self.target_strength,
            LogicalProduct::Mvbs => &self.mvbs,
        }
    }

    fn pointer_mut(&mut self, product: LogicalProduct) -> &mut ProductPointer {
        match product {
            LogicalProduct::Raw => &mut self.raw,
            LogicalProduct::Sv => &mut self.sv,
            LogicalProduct::SvClean => &mut self.sv_clean,
            LogicalProduct::TargetStrength => &mut self.target_strength,
            LogicalProduct::Mvbs => &mut self.mvbs,
        }
    }

    /// Assign, replace, or clear one product's path specification. A failure
    /// is local to that product; the other pointers are untouched.
    pub fn set_path(
        &mut self,
        product: LogicalProduct,
        input: Option<PathInput>,
    ) -> Result<(), PathError> {
        self.pointer_mut(product).set_path(input)
    }

    /// The lazily-opened combined view for one product; `None` while the
    /// product has no data, which is the normal pre-calibration state.
    pub fn view(&mut self, product: LogicalProduct) -> Option<&CombinedView> {
        self.pointer_mut(product).view()
    }

    /// Combined view over the raw data.
    pub fn raw(&mut self) -> Option<&CombinedView> {
        self.view(LogicalProduct::Raw)
    }

    /// Combined view over calibrated Sv.
    pub fn sv(&mut self) -> Option<&CombinedView> {
        self.view(LogicalProduct::Sv)
    }

    /// Combined view over noise-cleaned Sv.
    pub fn sv_clean(&mut self) -> Option<&CombinedView> {
        self.view(LogicalProduct::SvClean)
    }

    /// Combined view over target strength.
    pub fn target_strength(&mut self) -> Option<&CombinedView> {
        self.view(LogicalProduct::TargetStrength)
    }

    /// Combined view over aggregated MVBS.
    pub fn mvbs(&mut self) -> Option<&CombinedView> {
        self.view(LogicalProduct::Mvbs)
    }

    /// Save format of the raw data, from its first resolved path.
    pub fn save_format(&self) -> Option<SaveFormat> {
        self.raw
            .resolved()
            .first()
            .and_then(|p| SaveFormat::from_path(p))
    }

    /// The Environment group of the raw data, combined across files.
    pub fn environment(&mut self) -> Result<Option<Group>, CombineError> {
        self.raw_group(GroupName::Environment)
    }

    /// The Vendor group of the raw data, combined across files.
    pub fn vendor(&mut self) -> Result<Option<Group>, CombineError> {
        self.raw_group(GroupName::Vendor)
    }

    /// Read one group of the raw data, `None` when no raw data is assigned.
    pub fn raw_group(&mut self, name: GroupName) -> Result<Option<Group>, CombineError> {
        match self.raw() {
            Some(view) => view.group(name),
            None => Ok(None),
        }
    }
}
