#![allow(clippy::upper_case_acronyms)]

//! Bit patterns for the three C-instruction fields.

/// Destination field: which of the writable locations (RAM[A], D, A)
/// receive the ALU output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dest {
    M,
    D,
    MD,
    A,
    AM,
    AD,
    AMD,
}

impl Dest {
    /// Accepts the destination letters in any order.
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        match mnemonic {
            "M" => Some(Dest::M),
            "D" => Some(Dest::D),
            "MD" | "DM" => Some(Dest::MD),
            "A" => Some(Dest::A),
            "AM" | "MA" => Some(Dest::AM),
            "AD" | "DA" => Some(Dest::AD),
            "AMD" | "ADM" | "MAD" | "MDA" | "DAM" | "DMA" => Some(Dest::AMD),
            _ => None,
        }
    }

    pub fn bits(self) -> &'static str {
        match self {
            Dest::M => "001",
            Dest::D => "010",
            Dest::MD => "011",
            Dest::A => "100",
            Dest::AM => "101",
            Dest::AD => "110",
            Dest::AMD => "111",
        }
    }
}

/// Computation field: the 28 expressions the ALU can evaluate. The `M`
/// forms read RAM[A] instead of the A register (the leading `a` bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comp {
    Zero,
    One,
    NegOne,
    D,
    A,
    M,
    NotD,
    NotA,
    NotM,
    NegD,
    NegA,
    NegM,
    DPlusOne,
    APlusOne,
    MPlusOne,
    DMinusOne,
    AMinusOne,
    MMinusOne,
    DPlusA,
    DPlusM,
    DMinusA,
    DMinusM,
    AMinusD,
    MMinusD,
    DAndA,
    DAndM,
    DOrA,
    DOrM,
}

impl Comp {
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        match mnemonic {
            "0" => Some(Comp::Zero),
            "1" => Some(Comp::One),
            "-1" => Some(Comp::NegOne),
            "D" => Some(Comp::D),
            "A" => Some(Comp::A),
            "M" => Some(Comp::M),
            "!D" => Some(Comp::NotD),
            "!A" => Some(Comp::NotA),
            "!M" => Some(Comp::NotM),
            "-D" => Some(Comp::NegD),
            "-A" => Some(Comp::NegA),
            "-M" => Some(Comp::NegM),
            "D+1" => Some(Comp::DPlusOne),
            "A+1" => Some(Comp::APlusOne),
            "M+1" => Some(Comp::MPlusOne),
            "D-1" => Some(Comp::DMinusOne),
            "A-1" => Some(Comp::AMinusOne),
            "M-1" => Some(Comp::MMinusOne),
            "D+A" => Some(Comp::DPlusA),
            "D+M" => Some(Comp::DPlusM),
            "D-A" => Some(Comp::DMinusA),
            "D-M" => Some(Comp::DMinusM),
            "A-D" => Some(Comp::AMinusD),
            "M-D" => Some(Comp::MMinusD),
            "D&A" => Some(Comp::DAndA),
            "D&M" => Some(Comp::DAndM),
            "D|A" => Some(Comp::DOrA),
            "D|M" => Some(Comp::DOrM),
            _ => None,
        }
    }

    /// The `a` bit followed by the six ALU control bits.
    pub fn bits(self) -> &'static str {
        match self {
            Comp::Zero => "0101010",
            Comp::One => "0111111",
            Comp::NegOne => "0111010",
            Comp::D => "0001100",
            Comp::A => "0110000",
            Comp::M => "1110000",
            Comp::NotD => "0001101",
            Comp::NotA => "0110001",
            Comp::NotM => "1110001",
            Comp::NegD => "0001111",
            Comp::NegA => "0110011",
            Comp::NegM => "1110011",
            Comp::DPlusOne => "0011111",
            Comp::APlusOne => "0110111",
            Comp::MPlusOne => "1110111",
            Comp::DMinusOne => "0001110",
            Comp::AMinusOne => "0110010",
            Comp::MMinusOne => "1110010",
            Comp::DPlusA => "0000010",
            Comp::DPlusM => "1000010",
            Comp::DMinusA => "0010011",
            Comp::DMinusM => "1010011",
            Comp::AMinusD => "0000111",
            Comp::MMinusD => "1000111",
            Comp::DAndA => "0000000",
            Comp::DAndM => "1000000",
            Comp::DOrA => "0010101",
            Comp::DOrM => "1010101",
        }
    }
}

/// Jump field: branch condition evaluated against the ALU output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jump {
    JGT,
    JEQ,
    JGE,
    JLT,
    JNE,
    JLE,
    JMP,
}

impl Jump {
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        match mnemonic {
            "JGT" => Some(Jump::JGT),
            "JEQ" => Some(Jump::JEQ),
            "JGE" => Some(Jump::JGE),
            "JLT" => Some(Jump::JLT),
            "JNE" => Some(Jump::JNE),
            "JLE" => Some(Jump::JLE),
            "JMP" => Some(Jump::JMP),
            _ => None,
        }
    }

    pub fn bits(self) -> &'static str {
        match self {
            Jump::JGT => "001",
            Jump::JEQ => "010",
            Jump::JGE => "011",
            Jump::JLT => "100",
            Jump::JNE => "101",
            Jump::JLE => "110",
            Jump::JMP => "111",
        }
    }
}
