use std::fmt;

/// Finalised MIPS32 assembly output. Display renders the MARS/SPIM file
/// layout: the `.data` section always opens with the `__newline` entry used
/// by the `novalinha` statement, followed by the string constants in
/// emission order, then `.text` with the instructions in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MipsAssembly {
    data_section: String,
    text_section: String,
}

impl fmt::Display for MipsAssembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, ".data")?;
        writeln!(f, "__newline: .asciiz \"\\n\"")?;
        write!(f, "{}", self.data_section)?;
        writeln!(f, ".text")?;
        write!(f, "{}", self.text_section)
    }
}

/// MipsAssemblyBuilder is a Builder utility class that accumulates the two
/// output sections linearly. This is useful for backend generators to
/// implement business logic of generation without worrying about the final
/// file layout. In particular the builder owns label generation, which
/// keeps jump targets unique without the generator tracking a counter.
///
/// Both sections are growable strings; emission order is visit order and is
/// deterministic for a given input tree.
pub struct MipsAssemblyBuilder {
    data_section: String,
    text_section: String,
    label_count: usize,
}

impl MipsAssemblyBuilder {
    pub fn new() -> Self {
        Self {
            data_section: String::new(),
            text_section: String::new(),
            label_count: 0,
        }
    }

    /// Emit a single indented instruction into the .text section.
    pub fn emit(&mut self, instruction: &str) {
        self.text_section.push_str("  ");
        self.text_section.push_str(instruction);
        self.text_section.push('\n');
    }

    /// Emit an unindented directive line such as `.globl main`.
    pub fn emit_directive(&mut self, directive: &str) {
        self.text_section.push_str(directive);
        self.text_section.push('\n');
    }

    /// Define a label at the current position of the .text section.
    pub fn emit_label(&mut self, label: &str) {
        self.text_section.push_str(label);
        self.text_section.push_str(":\n");
    }

    /// Comment decorates the following instructions. Comments have no
    /// functional usage and purely help identify sections within the
    /// generated assembly.
    pub fn comment(&mut self, comment: &str) {
        self.text_section.push_str("\n  # ");
        self.text_section.push_str(comment);
        self.text_section.push('\n');
    }

    /// Append an entry line to the .data section.
    pub fn data(&mut self, entry: &str) {
        self.data_section.push_str(entry);
        self.data_section.push('\n');
    }

    /// Mint a fresh label. Labels are L0, L1, ... in request order and are
    /// never reused.
    pub fn create_label(&mut self) -> String {
        let label = format!("L{}", self.label_count);
        self.label_count += 1;
        label
    }

    /// Consume the builder into the finalised assembly.
    pub fn finalize(self) -> MipsAssembly {
        MipsAssembly {
            data_section: self.data_section,
            text_section: self.text_section,
        }
    }
}
