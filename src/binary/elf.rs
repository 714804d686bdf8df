//! ELF relocatable object reader

use crate::error::{LocalizerError, Result};
use goblin::elf::header::ET_REL;
use goblin::elf::section_header::SHN_UNDEF;
use goblin::elf::sym::{
    Sym, STB_GLOBAL, STB_WEAK, STT_FILE, STT_SECTION, STV_DEFAULT, STV_PROTECTED,
};
use goblin::elf::Elf;
use std::fs;
use std::path::Path;

/// A global or weak symbol defined by an object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinedSymbol {
    pub name: String,
    pub weak: bool,
    /// Default or protected visibility, i.e. exportable from a shared library
    pub exportable: bool,
}

/// Link-relevant symbols of one object file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectSymbols {
    /// Path recorded in the report
    pub path: String,
    pub defined: Vec<DefinedSymbol>,
    /// Names the object references but does not define
    pub undefined: Vec<String>,
}

/// Reads linker-visible symbols from ELF relocatable objects
#[derive(Debug, Clone, Copy, Default)]
pub struct ElfObjectReader;

impl ElfObjectReader {
    pub fn new() -> Self {
        Self
    }

    /// Check for the ELF magic number
    pub fn can_parse(&self, data: &[u8]) -> bool {
        data.len() >= 4 && &data[0..4] == b"\x7fELF"
    }

    /// Read an object file from disk
    pub fn read_file(&self, path: &Path, recorded_path: &str) -> Result<ObjectSymbols> {
        let data = fs::read(path).map_err(|source| LocalizerError::ObjectRead {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse(&data, path, recorded_path)
    }

    /// Parse object data
    pub fn parse(&self, data: &[u8], path: &Path, recorded_path: &str) -> Result<ObjectSymbols> {
        if !self.can_parse(data) {
            return Err(LocalizerError::UnsupportedObject {
                path: path.to_path_buf(),
                reason: "not an ELF file".to_string(),
            });
        }

        let elf = Elf::parse(data).map_err(|source| LocalizerError::ObjectParse {
            path: path.to_path_buf(),
            source,
        })?;

        if elf.header.e_type != ET_REL {
            return Err(LocalizerError::UnsupportedObject {
                path: path.to_path_buf(),
                reason: format!("expected a relocatable object, found ELF type {}", elf.header.e_type),
            });
        }

        let mut object = ObjectSymbols {
            path: recorded_path.to_string(),
            ..Default::default()
        };

        for sym in elf.syms.iter() {
            if !Self::is_linker_visible(&sym) {
                continue;
            }
            let name = match elf.strtab.get_at(sym.st_name) {
                Some(name) if !name.is_empty() => name,
                _ => continue,
            };

            if sym.st_shndx == SHN_UNDEF as usize {
                object.undefined.push(name.to_string());
            } else {
                let visibility = sym.st_visibility();
                object.defined.push(DefinedSymbol {
                    name: name.to_string(),
                    weak: sym.st_bind() == STB_WEAK,
                    exportable: visibility == STV_DEFAULT || visibility == STV_PROTECTED,
                });
            }
        }

        Ok(object)
    }

    fn is_linker_visible(sym: &Sym) -> bool {
        let bind = sym.st_bind();
        let kind = sym.st_type();
        (bind == STB_GLOBAL || bind == STB_WEAK) && kind != STT_FILE && kind != STT_SECTION
    }
}
