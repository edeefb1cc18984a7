//! Coded subfield values.
//!
//! Each enum maps the single-byte code found in the record; anything
//! unrecognised (including the S-57 "null" value 255) becomes `Null`.

use serde::{Deserialize, Serialize};

macro_rules! coded_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $code:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant,)+
            #[default]
            Null,
        }

        impl $name {
            pub fn from_code(code: u8) -> Self {
                match code {
                    $($code => Self::$variant,)+
                    _ => Self::Null,
                }
            }

            pub fn code(self) -> u8 {
                match self {
                    $(Self::$variant => $code,)+
                    Self::Null => 255,
                }
            }
        }
    };
}

coded_enum!(
    /// `ORNT`
    Orientation { Forward = 1, Reverse = 2 }
);

coded_enum!(
    /// `USAG`
    Usage { Exterior = 1, Interior = 2, ExteriorTruncated = 3 }
);

coded_enum!(
    /// `TOPI`
    Topology {
        BeginningNode = 1,
        EndNode = 2,
        LeftFace = 3,
        RightFace = 4,
        ContainingFace = 5,
    }
);

coded_enum!(
    /// `MASK`
    Masking { Mask = 1, Show = 2 }
);

coded_enum!(
    /// `RUIN`
    UpdateInstruction { Insert = 1, Delete = 2, Modify = 3 }
);

coded_enum!(
    /// `PRIM`
    GeometricPrimitive { Point = 1, Line = 2, Area = 3 }
);

coded_enum!(
    /// `RIND`
    Relationship { Master = 1, Slave = 2, Peer = 3 }
);
