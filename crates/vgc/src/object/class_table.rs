//! Class Table Module - Vtable and Descriptor Installation
//!
//! In a compiled program the vtables and type descriptors live in the
//! executable's data segment. Here the arena is the whole addressable
//! world, so classes are installed into the metadata region instead: the
//! descriptor's NUL-terminated tag bytes first, then a one-word vtable
//! whose first word points back at the descriptor (the layout the
//! collector's indirection expects).
//!
//! The table itself is a name-keyed registry kept outside the arena; the
//! collector only ever touches the installed bytes.

use indexmap::IndexMap;

use crate::error::{Result, VgcError};
use crate::heap::{Heap, WORD_SIZE};
use crate::object::descriptor::{self, FieldKind};
use crate::object::header::HEADER_SIZE;

/// One installed class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassEntry {
    /// Vtable address; what `allocate_object` takes and headers store
    pub class_ref: usize,
    /// Address of the descriptor tag bytes
    pub descriptor_ref: usize,
    /// Number of fields
    pub field_count: usize,
    /// Block size of one instance (header + packed fields)
    pub object_size: usize,
}

/// Name-keyed registry of installed classes
#[derive(Debug, Default)]
pub struct ClassTable {
    classes: IndexMap<String, ClassEntry>,
}

impl ClassTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            classes: IndexMap::new(),
        }
    }

    /// Install a class: write its descriptor and vtable, register the entry
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `name` is already installed and
    /// `StaticRegionFull` if the metadata region cannot hold the bytes.
    pub fn install(
        &mut self,
        heap: &mut Heap,
        name: &str,
        fields: &[FieldKind],
    ) -> Result<ClassEntry> {
        if self.classes.contains_key(name) {
            return Err(VgcError::InvalidArgument(format!(
                "class {:?} already installed",
                name
            )));
        }

        let descriptor_ref = descriptor::install(heap, fields)?;

        let class_ref = heap.static_alloc(WORD_SIZE)?;
        heap.set_word(class_ref, descriptor_ref);

        let object_size = HEADER_SIZE + fields.iter().map(|f| f.width()).sum::<usize>();
        let entry = ClassEntry {
            class_ref,
            descriptor_ref,
            field_count: fields.len(),
            object_size,
        };

        log::debug!(
            "installed class {:?}: vtable {:#x}, descriptor {:#x}, {} fields, {} bytes/instance",
            name,
            class_ref,
            descriptor_ref,
            fields.len(),
            object_size
        );

        self.classes.insert(name.to_string(), entry.clone());
        Ok(entry)
    }

    /// Look up a class by name
    pub fn get(&self, name: &str) -> Option<&ClassEntry> {
        self.classes.get(name)
    }

    /// Number of installed classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// True if nothing has been installed
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Iterate entries in installation order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClassEntry)> {
        self.classes.iter().map(|(name, entry)| (name.as_str(), entry))
    }
}
