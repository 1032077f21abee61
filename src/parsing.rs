#![allow(clippy::upper_case_acronyms)]

use nom::{
    branch::alt,
    bytes::complete::{is_a, is_not, tag, take_while, take_while1},
    character::complete::{alpha1, line_ending, satisfy, space0},
    combinator::{eof, map, map_res, opt, peek, value},
    sequence::{delimited, preceded, terminated, tuple},
    AsChar,
};
use nom_supreme::{
    error::ErrorTree, final_parser::final_parser, multi::collect_separated_terminated,
};

use crate::code::{Comp, Dest, Jump};
use crate::symbols::SymbolTable;

type IResult<I, O> = Result<(I, O), nom::Err<ErrorTree<I>>>;

/// Parses a whole source file into typed lines, one per physical line.
pub fn parse(input: &str) -> Result<Vec<Line>, ErrorTree<&str>> {
    let p = collect_separated_terminated(Line::parse, line_ending, eof);
    final_parser(p)(input)
}

#[derive(Debug)]
pub enum Line {
    Label(Label),
    A(AInstruction),
    C(CInstruction),
    Comment,
    Empty,
}

impl Line {
    fn parse(input: &str) -> IResult<&str, Self> {
        let label_line = map(Label::parse, Line::Label);
        let a_inst_line = map(AInstruction::parse, Line::A);
        let c_inst_line = map(CInstruction::parse, Line::C);
        let comment_line = map(Self::parse_comment, |_| Line::Comment);
        let empty_line = map(Self::parse_blank, |_| Line::Empty);
        alt((
            terminated(label_line, opt(Self::parse_comment)),
            terminated(a_inst_line, opt(Self::parse_comment)),
            terminated(c_inst_line, opt(Self::parse_comment)),
            comment_line,
            empty_line,
        ))(input)
    }

    fn parse_comment(input: &str) -> IResult<&str, ()> {
        value((), preceded(space0, preceded(tag("//"), is_not("\r\n"))))(input)
    }

    fn parse_blank(input: &str) -> IResult<&str, ()> {
        value((), space0)(input)
    }
}

#[derive(Debug)]
pub struct Label {
    pub symbol: String,
}

impl Label {
    fn new(symbol: String) -> Self {
        Self { symbol }
    }

    fn parse(input: &str) -> IResult<&str, Self> {
        let l = delimited(tag("("), parse_symbol, tag(")"));
        map(delimited(space0, l, space0), Self::new)(input)
    }
}

/// A real (word-producing) instruction, after label lines are removed.
#[derive(Debug)]
pub enum Instruction {
    A(AInstruction),
    C(CInstruction),
}

impl Instruction {
    fn end_delim(input: &str) -> IResult<&str, ()> {
        value((), alt((tag("//"), line_ending, eof)))(input)
    }
}

#[derive(Debug)]
pub enum SymbolOrAddress {
    Symbol(String),
    Address(u16),
}

#[derive(Debug)]
pub struct AInstruction {
    symbol_or_address: SymbolOrAddress,
}

impl AInstruction {
    fn new(symbol_or_address: SymbolOrAddress) -> Self {
        Self { symbol_or_address }
    }

    fn parse(input: &str) -> IResult<&str, Self> {
        let symbol_or_address = alt((
            map(parse_symbol, SymbolOrAddress::Symbol),
            map(parse_address, SymbolOrAddress::Address),
        ));
        let a = preceded(tag("@"), symbol_or_address);
        map(delimited(space0, a, space0), AInstruction::new)(input)
    }

    /// Leading 0 bit plus the 15-bit address. Resolving a symbol may
    /// allocate a fresh variable slot in the table.
    pub fn to_binary(&self, symbol_table: &mut SymbolTable) -> String {
        let address = match &self.symbol_or_address {
            SymbolOrAddress::Symbol(symbol) => symbol_table.resolve(symbol),
            SymbolOrAddress::Address(a) => *a,
        };
        format!("{address:016b}")
    }
}

#[derive(Debug)]
pub struct CInstruction {
    dest: Option<Dest>,
    comp: Comp,
    jump: Option<Jump>,
}

impl CInstruction {
    pub fn to_binary(&self) -> String {
        let dest = self.dest.map_or("000", Dest::bits);
        let jump = self.jump.map_or("000", Jump::bits);
        ["111", self.comp.bits(), dest, jump].concat()
    }

    fn parse(input: &str) -> IResult<&str, Self> {
        map(
            tuple((
                opt(Self::parse_dest),
                Self::parse_comp,
                opt(Self::parse_jump),
            )),
            |(dest, comp, jump)| Self { dest, comp, jump },
        )(input)
    }

    fn parse_dest(input: &str) -> IResult<&str, Dest> {
        let ident = terminated(delimited(space0, alpha1, space0), tag("="));
        map_res(ident, |ident| {
            Dest::from_mnemonic(ident).ok_or_else(|| format!("Invalid destination: {ident}"))
        })(input)
    }

    fn parse_jump(input: &str) -> IResult<&str, Jump> {
        let jump = delimited(space0, alpha1, space0);
        map_res(jump, |jump| {
            Jump::from_mnemonic(jump).ok_or_else(|| format!("Invalid jump: {jump}"))
        })(input)
    }

    // The computation field ends at ";" (consumed here, the jump parser
    // follows) or at end of line / trailing comment.
    fn parse_comp(input: &str) -> IResult<&str, Comp> {
        let comp = delimited(space0, is_a("01-+!ADM|&"), space0);
        let termination = alt((value((), tag(";")), peek(Instruction::end_delim)));
        let comp_term = terminated(comp, termination);
        map_res(comp_term, |comp: &str| {
            Comp::from_mnemonic(comp.trim()).ok_or_else(|| format!("Invalid comp: {comp}"))
        })(input)
    }
}

fn parse_symbol(input: &str) -> IResult<&str, String> {
    let valid_first_char = |c: char| c.is_alpha() || c == '_' || c == '.' || c == '$' || c == ':';
    let valid_tail_char = |c: char| valid_first_char(c) || c.is_ascii_digit();

    let parser = tuple((satisfy(valid_first_char), take_while(valid_tail_char)));
    let mut mapped = map(parser, |(head, tail)| format!("{head}{tail}"));
    mapped(input)
}

// Literal constants must fit the 15 address bits of an A-instruction.
fn parse_address(input: &str) -> IResult<&str, u16> {
    map_res(
        take_while1(|c: char| c.is_ascii_digit()),
        |address: &str| match address.parse::<u16>() {
            Ok(a) if a <= 0x7fff => Ok(a),
            Ok(a) => Err(format!("Address out of range: {a}")),
            Err(e) => Err(e.to_string()),
        },
    )(input)
}
