//
// Copyright 2022-Present (c) Raja Lehtihet & Wael El Oraiby
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice,
// this list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
// this list of conditions and the following disclaimer in the documentation
// and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its contributors
// may be used to endorse or promote products derived from this software without
// specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE
// LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR
// CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF
// SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS
// INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN
// CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
// ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
// POSSIBILITY OF SUCH DAMAGE.
//
// -----------------------------------------------------------------------------
// Ported to rust from https://github.com/rxi/microui/ and the original license
//
// Copyright (c) 2020 rxi
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to
// deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS
// IN THE SOFTWARE.
//
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;
use super::*;
use crate::config::Config;
use log::error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Whether a window, dialog, or popup is currently shown.
pub enum WindowState {
    /// The window is visible and participates in the root list for the frame.
    Open,
    /// The window is hidden; its body closure is not invoked.
    Closed,
}

pub(crate) struct Window {
    pub(crate) win_state: WindowState,
    pub(crate) main: Container,
    /// Set for the duration of a `begin_window`/`end_window` pair; catches
    /// a second `begin_window` on the same window before the first closed.
    active: bool,
}

impl Window {
    fn new(name: &str, atlas: AtlasHandle, style: Rc<Style>, input: Rc<RefCell<Input>>, config: Rc<Config>, win_state: WindowState) -> Self {
        Self { win_state, main: Container::with_config(name, atlas, style, input, config), active: false }
    }
}

#[derive(Clone)]
/// Reference-counted handle to a retained window, dialog, or popup.
/// Clones share the same underlying state; the host application keeps a handle alive
/// across frames to persist the window's position, scroll offset, and open/closed state.
pub struct WindowHandle(Rc<RefCell<Window>>);

impl WindowHandle {
    /// Creates an always-movable, initially open window.
    pub(crate) fn window(name: &str, atlas: AtlasHandle, style: Rc<Style>, input: Rc<RefCell<Input>>, config: Rc<Config>, initial_rect: Recti) -> Self {
        let mut window = Window::new(name, atlas, style, input, config, WindowState::Open);
        window.main.set_rect(initial_rect);
        Self(Rc::new(RefCell::new(window)))
    }

    /// Creates a modal dialog window, initially closed until [`crate::Context::open_dialog`] is called.
    pub(crate) fn dialog(name: &str, atlas: AtlasHandle, style: Rc<Style>, input: Rc<RefCell<Input>>, config: Rc<Config>, initial_rect: Recti) -> Self {
        let mut window = Window::new(name, atlas, style, input, config, WindowState::Closed);
        window.main.set_rect(initial_rect);
        Self(Rc::new(RefCell::new(window)))
    }

    /// Creates a popup window, initially closed until opened at the cursor or an anchor rect.
    pub(crate) fn popup(name: &str, atlas: AtlasHandle, style: Rc<Style>, input: Rc<RefCell<Input>>, config: Rc<Config>) -> Self {
        Self(Rc::new(RefCell::new(Window::new(name, atlas, style, input, config, WindowState::Closed))))
    }

    /// Returns `true` if the window is currently shown.
    pub fn is_open(&self) -> bool { self.0.borrow().win_state == WindowState::Open }

    pub(crate) fn inner_mut<'a>(&'a mut self) -> RefMut<'a, Window> { self.0.borrow_mut() }

    pub(crate) fn inner<'a>(&'a mut self) -> Ref<'a, Window> { self.0.borrow() }

    pub(crate) fn prepare(&mut self) { self.inner_mut().main.prepare(); }

    pub(crate) fn render<R: Renderer>(&mut self, canvas: &mut Canvas<R>) { self.inner_mut().main.render(canvas) }

    pub(crate) fn finish(&mut self) { self.inner_mut().main.finish() }

    pub(crate) fn zindex(&self) -> i32 { self.0.borrow().main.zindex }

    /// Draws window chrome for the frame; closes the window if its close button was clicked.
    pub(crate) fn begin_window(&mut self, opt: ContainerOption, bopt: WidgetBehaviourOption) {
        {
            let mut window = self.inner_mut();
            if window.active {
                error!("window '{}': begin_window called again before a matching end_window", window.main.name);
            }
            window.active = true;
        }
        let close_clicked = self.inner_mut().main.begin_window(opt, bopt);
        if close_clicked {
            self.inner_mut().win_state = WindowState::Closed;
        }
    }

    pub(crate) fn end_window(&mut self) {
        self.inner_mut().main.end_window();
        self.inner_mut().active = false;
    }
}
