pub mod buzzer;
pub mod drive;
pub mod headlight;
pub mod led;
pub mod servo;

use alloc::boxed::Box;
use core::fmt::Debug;
use core::task::Poll;
use defmt::Format;

use crate::error::{BoxError, Error};

// receive inspired by https://github.com/rtic-rs/rfcs/pull/0052
// poll inspired by https://docs.rs/stepper
pub trait Actuator {
    type Action;
    type Error: Error;

    fn run(&mut self, action: &Self::Action);
    fn poll(&mut self) -> Poll<Result<(), Self::Error>>;
}

pub type BoxActuator<Action> = Box<dyn Actuator<Action = Action, Error = BoxError>>;

pub struct BoxifyActuator<A: Actuator>(A);

impl<A: Actuator> BoxifyActuator<A> {
    pub fn new(actuator: A) -> Self {
        Self(actuator)
    }
}

impl<A: Actuator> Actuator for BoxifyActuator<A>
where
    A::Error: 'static,
{
    type Action = A::Action;
    type Error = BoxError;

    fn run(&mut self, action: &Self::Action) {
        self.0.run(action)
    }
    fn poll(&mut self) -> Poll<Result<(), Self::Error>> {
        self.0
            .poll()
            .map_err(|error| (Box::new(error) as Box<dyn Error>).into())
    }
}

/// A fixed family of same-action actuators, addressed by id.
///
/// Implementations are normally generated with [`actuator_set!`], which turns
/// a list of names into an id enum, a set struct, and this impl.
pub trait ActuatorSet {
    type Action;
    type Id: Clone + Copy + Debug + Format;
    type Error: Debug;

    fn run(&mut self, id: &Self::Id, action: &Self::Action);
    fn poll(&mut self, id: &Self::Id) -> Poll<Result<(), Self::Error>>;
}

/// Generate an id enum, set struct, and error enum for a fixed family of
/// actuators sharing one action type.
///
/// ```ignore
/// actuator_set!(Headlight { Left, Right }, HeadlightAction<TICK_TIMER_HZ>,
///     HeadlightId, HeadlightSet, HeadlightSetError);
/// ```
///
/// An empty member list (`actuator_set!(Servo {}, ...)`) is allowed and
/// yields an uninhabited id, for builds that do not populate every slot of a
/// [`Command`](crate::runner::Command).
#[macro_export]
macro_rules! actuator_set {
    // no members: uninhabited id, unit set
    ($name:ident {}, $action:ty, $id:ident, $set:ident, $error:ident) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, defmt::Format)]
        pub enum $id {}

        #[derive(Debug)]
        pub enum $error {}

        impl $crate::error::Error for $error {}

        pub struct $set;

        impl $set {
            pub fn new() -> Self {
                Self
            }
        }

        impl $crate::actuators::ActuatorSet for $set {
            type Action = $action;
            type Id = $id;
            type Error = $error;

            fn run(&mut self, id: &Self::Id, _action: &Self::Action) {
                match *id {}
            }

            fn poll(&mut self, id: &Self::Id) -> core::task::Poll<Result<(), Self::Error>> {
                match *id {}
            }
        }
    };
    ($name:ident { $($member:ident),+ $(,)? }, $action:ty, $id:ident, $set:ident, $error:ident) => {
        $crate::paste::paste! {
            #[derive(Clone, Copy, Debug, PartialEq, Eq, defmt::Format)]
            pub enum $id {
                $($member),*
            }

            #[derive(Debug)]
            pub enum $error<$([<$member Error>]: core::fmt::Debug),*> {
                $($member([<$member Error>])),*
            }

            impl<$([<$member Error>]: core::fmt::Debug),*> $crate::error::Error
                for $error<$([<$member Error>]),*>
            {
            }

            pub struct $set<$($member),*>
            where
                $($member: $crate::actuators::Actuator<Action = $action>),*
            {
                $([<$member:snake>]: $member),*
            }

            impl<$($member),*> $set<$($member),*>
            where
                $($member: $crate::actuators::Actuator<Action = $action>),*
            {
                #[allow(clippy::too_many_arguments)]
                pub fn new($([<$member:snake>]: $member),*) -> Self {
                    Self {
                        $([<$member:snake>]),*
                    }
                }
            }

            impl<$($member),*> $crate::actuators::ActuatorSet for $set<$($member),*>
            where
                $($member: $crate::actuators::Actuator<Action = $action>),*
            {
                type Action = $action;
                type Id = $id;
                type Error = $error<$($member::Error),*>;

                fn run(&mut self, id: &Self::Id, action: &Self::Action) {
                    match *id {
                        $($id::$member => self.[<$member:snake>].run(action)),*
                    }
                }

                fn poll(&mut self, id: &Self::Id) -> core::task::Poll<Result<(), Self::Error>> {
                    match *id {
                        $($id::$member => self
                            .[<$member:snake>]
                            .poll()
                            .map_err($error::$member)),*
                    }
                }
            }
        }
    };
}
