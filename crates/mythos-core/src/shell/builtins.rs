//! Commands implemented inside the shell

use std::collections::HashMap;

/// Accepted argument count of a builtin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    pub max: usize,
}

impl Arity {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Warning for `args` outside this arity. The command still runs.
    pub fn check(&self, args: &[String]) -> Option<String> {
        if args.len() < self.min {
            Some(format!("Too few arguments (expected at least {})", self.min))
        } else if args.len() > self.max {
            // With no arguments accepted, the last one is named
            let last = match self.max {
                0 => &args[args.len() - 1],
                max => &args[max - 1],
            };
            Some(format!("Arguments after '{}' will be ignored", last))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinKind {
    Cd,
    Ls,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Builtin {
    pub kind: BuiltinKind,
    pub arity: Arity,
}

/// Name to handler table consulted before external commands
#[derive(Debug, Clone)]
pub struct BuiltinRegistry {
    builtins: HashMap<&'static str, Builtin>,
}

impl BuiltinRegistry {
    pub fn empty() -> Self {
        Self {
            builtins: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: &'static str, kind: BuiltinKind, arity: Arity) {
        self.builtins.insert(name, Builtin { kind, arity });
    }

    pub fn get(&self, name: &str) -> Option<&Builtin> {
        self.builtins.get(name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.builtins.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("cd", BuiltinKind::Cd, Arity::new(0, 1));
        registry.register("ls", BuiltinKind::Ls, Arity::new(0, 1));
        registry.register("exit", BuiltinKind::Exit, Arity::new(0, 0));
        registry
    }
}
