//! Compile-time guards on the types handed to Bevy observers and resources.
use static_assertions::{assert_impl_all, assert_not_impl_any};
use trackfolio::proximity::PresenterEvent;
use trackfolio::session::DriveSession;
use trackfolio::surface::SurfaceBuffer;

assert_impl_all!(PresenterEvent: Send, Sync, Clone);
assert_impl_all!(DriveSession: Send, Sync);
assert_not_impl_any!(DriveSession: Copy);
assert_not_impl_any!(SurfaceBuffer: Copy);
