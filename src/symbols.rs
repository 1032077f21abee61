use std::collections::HashMap;

/// Symbols the architecture pre-defines: virtual registers, the VM
/// pointers aliased onto R0..R4, and the memory-mapped I/O bases.
const PREDEFINED: [(&str, u16); 23] = [
    ("SP", 0),
    ("LCL", 1),
    ("ARG", 2),
    ("THIS", 3),
    ("THAT", 4),
    ("R0", 0),
    ("R1", 1),
    ("R2", 2),
    ("R3", 3),
    ("R4", 4),
    ("R5", 5),
    ("R6", 6),
    ("R7", 7),
    ("R8", 8),
    ("R9", 9),
    ("R10", 10),
    ("R11", 11),
    ("R12", 12),
    ("R13", 13),
    ("R14", 14),
    ("R15", 15),
    ("SCREEN", 16384),
    ("KBD", 24576),
];

/// First RAM address handed out to user variables.
const FIRST_VARIABLE_ADDRESS: u16 = 16;

/// Name-to-address map for one translation run, shared by both passes:
/// pass 1 adds labels, pass 2 allocates variables.
#[derive(Debug)]
pub struct SymbolTable {
    next_variable: u16,
    symbols: HashMap<String, u16>,
}

impl SymbolTable {
    pub fn new() -> Self {
        let symbols = PREDEFINED
            .iter()
            .map(|&(symbol, address)| (symbol.to_string(), address))
            .collect();
        Self {
            next_variable: FIRST_VARIABLE_ADDRESS,
            symbols,
        }
    }

    /// Records a label's instruction address. Returns the previously
    /// recorded address if the name was already bound.
    pub fn define_label(&mut self, label: String, address: u16) -> Option<u16> {
        self.symbols.insert(label, address)
    }

    /// Resolves a symbol, allocating the next free variable slot on first
    /// sight. Known-ness is decided by key presence, never by the stored
    /// value: address 0 (R0, SP, a label at program start) is a valid
    /// resolution.
    pub fn resolve(&mut self, symbol: &str) -> u16 {
        match self.symbols.get(symbol) {
            Some(&address) => address,
            None => {
                let address = self.next_variable;
                self.symbols.insert(symbol.to_string(), address);
                self.next_variable += 1;
                address
            }
        }
    }

    pub fn variables_allocated(&self) -> u16 {
        self.next_variable - FIRST_VARIABLE_ADDRESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predefined_symbols_resolve() {
        let mut table = SymbolTable::new();
        assert_eq!(table.resolve("R0"), 0);
        assert_eq!(table.resolve("R15"), 15);
        assert_eq!(table.resolve("THAT"), 4);
        assert_eq!(table.resolve("SCREEN"), 16384);
        assert_eq!(table.resolve("KBD"), 24576);
        assert_eq!(table.variables_allocated(), 0);
    }

    #[test]
    fn variables_allocate_from_16() {
        let mut table = SymbolTable::new();
        assert_eq!(table.resolve("i"), 16);
        assert_eq!(table.resolve("sum"), 17);
        assert_eq!(table.resolve("i"), 16);
        assert_eq!(table.resolve("sum"), 17);
        assert_eq!(table.variables_allocated(), 2);
    }

    #[test]
    fn label_bound_to_address_zero_is_not_a_variable() {
        let mut table = SymbolTable::new();
        assert_eq!(table.define_label("START".to_string(), 0), None);
        assert_eq!(table.resolve("START"), 0);
        assert_eq!(table.variables_allocated(), 0);
    }

    #[test]
    fn redefined_label_reports_previous_address() {
        let mut table = SymbolTable::new();
        assert_eq!(table.define_label("X".to_string(), 3), None);
        assert_eq!(table.define_label("X".to_string(), 7), Some(3));
    }
}
