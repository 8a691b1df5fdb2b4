//! iNES cartridge loading.
//!
//! Mapper 0 (NROM) only: PRG is 16K (mirrored across the upper bank) or
//! 32K, CHR is 8K ROM or, when the image ships none, 8K RAM.

use fc_ppu_2c02::Mirroring;
use thiserror::Error;

const INES_MAGIC: [u8; 4] = *b"NES\x1A";
const HEADER_LEN: usize = 16;
const TRAINER_LEN: usize = 512;
const PRG_BANK: usize = 16 * 1024;
const CHR_BANK: usize = 8 * 1024;

/// Cartridge load failures. Nothing is constructed on error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartridgeError {
    #[error("not an iNES image (bad magic)")]
    BadMagic,
    #[error("image truncated: expected {expected} bytes, found {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("mapper {0} is not supported (NROM only)")]
    UnsupportedMapper(u8),
}

/// A parsed NROM cartridge.
#[derive(Debug, PartialEq, Eq)]
pub struct Cartridge {
    pub prg: Vec<u8>,
    pub chr: Vec<u8>,
    /// True when the image shipped no CHR and we provide RAM instead.
    pub chr_writable: bool,
    pub mirroring: Mirroring,
}

impl Cartridge {
    /// Parse an iNES image.
    pub fn parse(data: &[u8]) -> Result<Self, CartridgeError> {
        if data.len() < HEADER_LEN {
            return Err(CartridgeError::Truncated {
                expected: HEADER_LEN,
                actual: data.len(),
            });
        }
        if data[0..4] != INES_MAGIC {
            return Err(CartridgeError::BadMagic);
        }

        let prg_banks = usize::from(data[4]);
        let chr_banks = usize::from(data[5]);
        let flags6 = data[6];
        let flags7 = data[7];
        let mapper = (flags7 & 0xF0) | (flags6 >> 4);
        if mapper != 0 {
            return Err(CartridgeError::UnsupportedMapper(mapper));
        }

        // Header bit 0 set pairs NT0 with NT2; clear pairs NT0 with NT1.
        let mirroring = if flags6 & 0x01 != 0 {
            Mirroring::Horizontal
        } else {
            Mirroring::Vertical
        };

        let mut offset = HEADER_LEN;
        if flags6 & 0x04 != 0 {
            offset += TRAINER_LEN;
        }

        let prg_len = prg_banks * PRG_BANK;
        let chr_len = chr_banks * CHR_BANK;
        let expected = offset + prg_len + chr_len;
        if data.len() < expected {
            return Err(CartridgeError::Truncated {
                expected,
                actual: data.len(),
            });
        }

        let prg = data[offset..offset + prg_len].to_vec();
        let (chr, chr_writable) = if chr_len == 0 {
            (vec![0; CHR_BANK], true)
        } else {
            (data[offset + prg_len..offset + prg_len + chr_len].to_vec(), false)
        };

        log::info!(
            "loaded NROM image: {}K PRG, {}K CHR{}, {:?} mirroring",
            prg_len / 1024,
            chr.len() / 1024,
            if chr_writable { " RAM" } else { "" },
            mirroring
        );

        Ok(Self {
            prg,
            chr,
            chr_writable,
            mirroring,
        })
    }

    /// CPU read in $8000-$FFFF. A 16K bank mirrors across the range.
    #[must_use]
    pub fn prg_read(&self, addr: u16) -> u8 {
        if self.prg.is_empty() {
            return 0;
        }
        self.prg[(usize::from(addr) - 0x8000) % self.prg.len()]
    }
}
