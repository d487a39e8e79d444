//! Symbolic enumerations persisted by name.
//!
//! Every enum here is written to project files as its symbolic name
//! (`"C64"`, `"BYTE_HEX"`, ...). Parsing is exact and case-sensitive: a name
//! that matches no variant is an error, never a silent default.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ModelError;

macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident as $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// All variants in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the symbolic name written to project files.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(ModelError::unknown_name($kind, s)),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let name = String::deserialize(deserializer)?;
                name.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

named_enum! {
    /// Container kind of the program image.
    pub enum FileType as "file type" {
        /// Undefined / raw binary.
        #[default]
        Und => "UND",
        /// Commodore program with a two-byte load address.
        Prg => "PRG",
        /// PSID/RSID tune.
        Sid => "SID",
        /// Compute's Gazette music file.
        Mus => "MUS",
        /// Disk drive code.
        Drv => "DRV",
        /// Multi-program container; an auxiliary index is derived from the image.
        Mpr => "MPR",
        /// Cartridge image.
        Crt => "CRT",
        /// Emulator snapshot.
        Vsf => "VSF",
        /// AY tune.
        Ay => "AY",
    }
}

impl FileType {
    /// Whether decoding must derive a container index from the input bytes.
    #[must_use]
    pub const fn has_container_index(self) -> bool {
        matches!(self, Self::Mpr)
    }
}

named_enum! {
    /// Target machine family.
    pub enum TargetType as "target type" {
        #[default]
        C64 => "C64",
        C1541 => "C1541",
        C128 => "C128",
        Vic20 => "VIC20",
        Plus4 => "PLUS4",
    }
}

named_enum! {
    /// How a data byte is rendered by the disassembler.
    pub enum DataType as "data type" {
        /// No explicit data rendering chosen.
        #[default]
        None => "NONE",
        ByteHex => "BYTE_HEX",
        ByteDec => "BYTE_DEC",
        ByteBin => "BYTE_BIN",
        ByteChar => "BYTE_CHAR",
        Word => "WORD",
        Swapped => "SWAPPED",
        Tribyte => "TRIBYTE",
        Long => "LONG",
        Address => "ADDRESS",
        StackWord => "STACK_WORD",
        MonoSprite => "MONO_SPRITE",
        MultiSprite => "MULTI_SPRITE",
        Text => "TEXT",
        NumText => "NUM_TEXT",
        ZeroText => "ZERO_TEXT",
        HighText => "HIGH_TEXT",
        ShiftText => "SHIFT_TEXT",
        ScreenText => "SCREEN_TEXT",
        PetasciiText => "PETASCII_TEXT",
    }
}

named_enum! {
    /// BASIC dialect used to detokenize a cell.
    pub enum BasicType as "basic type" {
        #[default]
        None => "NONE",
        BasicV2_0 => "BASIC_V2_0",
        BasicV3_5 => "BASIC_V3_5",
        BasicV4_0 => "BASIC_V4_0",
        BasicV7_0 => "BASIC_V7_0",
        BasicV10_0 => "BASIC_V10_0",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for ty in DataType::ALL {
            assert_eq!(ty.as_str().parse::<DataType>(), Ok(*ty));
        }
        for ty in FileType::ALL {
            assert_eq!(ty.as_str().parse::<FileType>(), Ok(*ty));
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("c64".parse::<TargetType>().is_err());
        assert_eq!("VIC20".parse::<TargetType>(), Ok(TargetType::Vic20));
    }

    #[test]
    fn test_unknown_name() {
        let err = "BASIC_V9".parse::<BasicType>().unwrap_err();
        assert_eq!(err, ModelError::unknown_name("basic type", "BASIC_V9"));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(TargetType::default(), TargetType::C64);
        assert_eq!(DataType::default(), DataType::None);
        assert_eq!(BasicType::default(), BasicType::None);
        assert_eq!(FileType::default(), FileType::Und);
        assert!(FileType::Mpr.has_container_index());
    }

    #[test]
    fn test_serde_uses_symbolic_name() {
        let json = serde_json::to_string(&DataType::StackWord).unwrap();
        assert_eq!(json, "\"STACK_WORD\"");
        let parsed: DataType = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, DataType::StackWord);
        assert!(serde_json::from_str::<DataType>("\"WORDY\"").is_err());
    }
}
