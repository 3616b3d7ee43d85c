//! Model-view matrix stack.
//!
//! The bottom entry is the view matrix loaded at frame start. Every node
//! pushes a copy of the top, post-multiplies its local placement onto it,
//! draws, and pops. The call structure of the scene walk is the tree.
//!
//! Misuse (push before load, pop past the base, an unbalanced scope) is a
//! programmer error and panics.

use std::ops::{Deref, DerefMut};

use crate::transform::LocalOp;
use crate::{Mat4, Vec3};

#[derive(Clone, Debug, Default)]
pub struct MatrixStack {
    entries: Vec<Mat4>,
}

impl MatrixStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole stack with a single base entry.
    pub fn load(&mut self, m: Mat4) {
        self.entries.clear();
        self.entries.push(m);
    }

    /// Duplicate the top entry.
    pub fn push(&mut self) {
        let Some(&top) = self.entries.last() else {
            panic!("MatrixStack::push called before load");
        };
        self.entries.push(top);
    }

    /// Post-multiply the top entry: `top = top * local`.
    pub fn multiply(&mut self, local: Mat4) {
        let Some(top) = self.entries.last_mut() else {
            panic!("MatrixStack::multiply called before load");
        };
        *top *= local;
    }

    /// Remove the top entry. Never removes the base entry.
    pub fn pop(&mut self) {
        assert!(
            self.entries.len() > 1,
            "MatrixStack underflow: pop would remove the base entry (depth={})",
            self.entries.len()
        );
        self.entries.pop();
    }

    /// Current cumulative model-view transform.
    #[inline]
    pub fn top(&self) -> Mat4 {
        match self.entries.last() {
            Some(m) => *m,
            None => panic!("MatrixStack::top called before load"),
        }
    }

    /// Number of entries, base included. Zero before the first `load`.
    #[inline]
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn apply(&mut self, op: LocalOp) {
        self.multiply(op.matrix());
    }

    #[inline]
    pub fn translate(&mut self, t: Vec3) {
        self.multiply(Mat4::from_translation(t));
    }

    #[inline]
    pub fn scale(&mut self, s: Vec3) {
        self.multiply(Mat4::from_scale(s));
    }

    #[inline]
    pub fn rotate_y(&mut self, degrees: f32) {
        self.apply(LocalOp::RotateY(degrees));
    }

    #[inline]
    pub fn rotate_z(&mut self, degrees: f32) {
        self.apply(LocalOp::RotateZ(degrees));
    }

    /// Push and return a guard that pops on drop, on every exit path.
    pub fn scope(&mut self) -> StackScope<'_> {
        self.push();
        let depth = self.depth();
        StackScope { stack: self, depth }
    }
}

/// A pushed stack level. Derefs to the stack; pops when dropped.
pub struct StackScope<'a> {
    stack: &'a mut MatrixStack,
    depth: usize,
}

impl Deref for StackScope<'_> {
    type Target = MatrixStack;

    fn deref(&self) -> &MatrixStack {
        self.stack
    }
}

impl DerefMut for StackScope<'_> {
    fn deref_mut(&mut self) -> &mut MatrixStack {
        self.stack
    }
}

impl Drop for StackScope<'_> {
    fn drop(&mut self) {
        // Don't turn an unwinding panic into an abort.
        if std::thread::panicking() {
            return;
        }
        assert_eq!(
            self.stack.depth(),
            self.depth,
            "unbalanced push/pop inside a stack scope"
        );
        self.stack.pop();
    }
}
